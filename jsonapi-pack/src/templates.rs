//! Link templates: one URL pattern per declared relationship

use crate::wrapper::Wrapper;
use jsonapi_format::link::template_key;
use jsonapi_format::{LinkTemplate, LinkTemplates};

impl Wrapper {
    /// Build the `links` section for this resource type.
    ///
    /// Depends only on the declared references, never on packed data.
    /// Returns `None` when no reference is declared.
    pub fn link_templates(&self) -> Option<LinkTemplates> {
        if self.references().is_empty() {
            return None;
        }

        let base_url = self.context().base_url();
        let templates = self
            .references()
            .iter()
            .map(|reference| {
                let key = template_key(self.resource_type(), reference.name());
                let template = LinkTemplate::new(base_url, reference.target(), &key);
                (key, template)
            })
            .collect();

        Some(templates)
    }
}
