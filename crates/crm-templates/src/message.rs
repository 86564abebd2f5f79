//! Message templates rendered through the resolver

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::properties::PropertyMap;
use crate::resolver::Resolver;

/// Subject and bodies of an outbound message, before or after rendering
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub subject: String,
    #[serde(default)]
    pub html_body: Option<String>,
    #[serde(default)]
    pub text_body: Option<String>,
}

impl MessageTemplate {
    /// Interpolate every part of the message against `properties`
    pub fn render(
        &self,
        resolver: &Resolver,
        properties: &PropertyMap,
    ) -> Result<MessageTemplate, TemplateError> {
        let render_part = |part: &Option<String>| -> Result<Option<String>, TemplateError> {
            part.as_deref()
                .map(|text| resolver.interpolate(text, properties))
                .transpose()
        };

        Ok(MessageTemplate {
            subject: resolver.interpolate(&self.subject, properties)?,
            html_body: render_part(&self.html_body)?,
            text_body: render_part(&self.text_body)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{FieldDeclarations, Fields};
    use crate::links::UrlActionLinks;
    use crate::properties::{PropertyValue, DEFAULT_RECIPIENT_KEY};
    use std::sync::Arc;

    struct Offer {
        title: String,
    }

    impl Fields for Offer {
        fn declare(fields: &mut FieldDeclarations<Self>) {
            fields.field("title", |o| Some(o.title.clone()));
        }
    }

    #[test]
    fn test_render_all_parts() {
        let resolver = Resolver::new(Arc::new(UrlActionLinks::new("https://t.example.com")));
        let props = PropertyMap::new()
            .with_object(
                "offer",
                Offer {
                    title: "Spring sale".into(),
                },
            )
            .with(DEFAULT_RECIPIENT_KEY, PropertyValue::Id(12));

        let template = MessageTemplate {
            subject: "{{offer.title}} inside".into(),
            html_body: Some("<a href=\"{{#a.3}}\">{{offer.title}}</a>".into()),
            text_body: None,
        };

        let rendered = template.render(&resolver, &props).unwrap();
        assert_eq!(rendered.subject, "Spring sale inside");
        assert_eq!(
            rendered.html_body.as_deref(),
            Some("<a href=\"https://t.example.com/a/3/12/\">Spring sale</a>")
        );
        assert_eq!(rendered.text_body, None);
    }
}
