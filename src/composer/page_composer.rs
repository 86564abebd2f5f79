//! Master/content page merge and interpolation

use std::iter;
use std::sync::Arc;

use crm_pages_types::Page;
use crm_templates::Resolver;
use tracing::debug;

use super::options::{CompositionFlags, CompositionOptions, CompositionResult};
use crate::error::ComposeError;

/// Default marker in master HTML where the next inner layer is inserted
pub const DEFAULT_CONTENT_PLACEHOLDER: &str = "[[slot]]";

/// Compiles master + content pages into published pages
///
/// Stateless apart from the shared resolver; one composer can serve any
/// number of concurrent compilations.
pub struct PageComposer {
    resolver: Arc<Resolver>,
    content_placeholder: String,
}

impl PageComposer {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self {
            resolver,
            content_placeholder: DEFAULT_CONTENT_PLACEHOLDER.to_string(),
        }
    }

    /// Composer using a custom content marker; the marker must not be empty
    pub fn with_placeholder(
        resolver: Arc<Resolver>,
        content_placeholder: impl Into<String>,
    ) -> Result<Self, ComposeError> {
        let content_placeholder = content_placeholder.into();
        if content_placeholder.is_empty() {
            return Err(ComposeError::EmptyContentPlaceholder);
        }
        Ok(Self {
            resolver,
            content_placeholder,
        })
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    pub fn content_placeholder(&self) -> &str {
        &self.content_placeholder
    }

    /// Compile one page
    ///
    /// 1. Merge (if `MERGE_MASTER_AND_CONTENT` and at least one master):
    ///    fold `[masters.., content]` into one page.
    ///    Otherwise the compiled page is the content page.
    /// 2. Interpolate HTML (if `INTERPOLATE_HTML_CONTENT`) and CSS
    ///    (if `INTERPOLATE_STYLE_CONTENT`) against `options.properties`.
    ///
    /// Input pages are never modified.
    pub fn compile(&self, options: &CompositionOptions) -> Result<CompositionResult, ComposeError> {
        let content_page = options
            .content_page
            .as_ref()
            .ok_or(ComposeError::MissingRequiredInput("content page"))?;
        let portal = options
            .portal
            .as_ref()
            .ok_or(ComposeError::MissingRequiredInput("portal"))?;

        let flags = options.flags;
        let mut compiled = if flags.contains(CompositionFlags::MERGE_MASTER_AND_CONTENT)
            && !options.master_pages.is_empty()
        {
            debug!(
                "Merging {} master page(s) into {} for portal {}",
                options.master_pages.len(),
                content_page.uri,
                portal.id
            );
            self.merge(&options.master_pages, content_page)
        } else {
            content_page.clone()
        };

        if flags.contains(CompositionFlags::INTERPOLATE_HTML_CONTENT) {
            if let Some(html) = compiled.html_content.as_deref() {
                debug!("Interpolating HTML of {}", compiled.uri);
                compiled.html_content = Some(self.resolver.interpolate(html, &options.properties)?);
            }
        }

        if flags.contains(CompositionFlags::INTERPOLATE_STYLE_CONTENT) {
            if let Some(css) = compiled.style_content.as_deref() {
                debug!("Interpolating CSS of {}", compiled.uri);
                compiled.style_content = Some(self.resolver.interpolate(css, &options.properties)?);
            }
        }

        Ok(CompositionResult {
            master_page: options.master_pages.last().cloned(),
            content_page: content_page.clone(),
            compiled_page: compiled,
        })
    }

    /// Fold master pages (outermost first) and the content page into one
    ///
    /// - name, description: latest layer that specifies one wins
    /// - HTML: each layer replaces the content placeholder in the accumulated HTML
    /// - CSS: appended in layer order
    /// - references: appended in layer order, duplicates kept
    /// - id, uri: always the content page's
    pub fn merge(&self, masters: &[Page], content_page: &Page) -> Page {
        let mut layers = masters.iter().chain(iter::once(content_page));

        let mut name: Option<String> = None;
        let mut description: Option<String> = None;
        let mut html = String::new();
        let mut css = String::new();
        let mut references = Vec::new();

        if let Some(first) = layers.next() {
            name.clone_from(&first.name);
            description.clone_from(&first.description);
            html.push_str(first.html());
            css.push_str(first.style());
            references.extend(first.references.iter().cloned());
        }

        for layer in layers {
            if layer.name.is_some() {
                name.clone_from(&layer.name);
            }
            if layer.description.is_some() {
                description.clone_from(&layer.description);
            }

            html = html.replace(&self.content_placeholder, layer.html());

            css.push_str(layer.style());

            references.extend(layer.references.iter().cloned());
        }

        Page {
            id: content_page.id,
            uri: content_page.uri.clone(),
            name,
            description,
            html_content: (!html.is_empty()).then_some(html),
            style_content: (!css.is_empty()).then_some(css),
            references,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_pages_types::{PageReference, PortalRef};
    use crm_templates::{ActionLinkProvider, UrlActionLinks};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn composer() -> PageComposer {
        let links: Arc<dyn ActionLinkProvider> =
            Arc::new(UrlActionLinks::new("https://t.example.com"));
        PageComposer::new(Arc::new(Resolver::new(links)))
    }

    fn page(uri: &str) -> Page {
        Page::new(Uuid::new_v4(), uri)
    }

    #[test]
    fn test_merge_inserts_content_into_slot() {
        let master = page("/master").with_html("<div>[[slot]]</div>");
        let content = page("/content").with_html("<p>Hi</p>");

        let merged = composer().merge(&[master], &content);
        assert_eq!(merged.html(), "<div><p>Hi</p></div>");
    }

    #[test]
    fn test_merge_nested_masters() {
        let outer = page("/outer").with_html("<html>[[slot]]</html>");
        let inner = page("/inner").with_html("<body>[[slot]]</body>");
        let content = page("/content").with_html("<p>x</p>");

        let merged = composer().merge(&[outer, inner], &content);
        assert_eq!(merged.html(), "<html><body><p>x</p></body></html>");
    }

    #[test]
    fn test_merge_layer_without_html_clears_slot() {
        let master = page("/master").with_html("<div>[[slot]]</div>");
        let content = page("/content");

        let merged = composer().merge(&[master], &content);
        assert_eq!(merged.html(), "<div></div>");
    }

    #[test]
    fn test_merge_replaces_every_slot_occurrence() {
        let master = page("/master").with_html("[[slot]]|[[slot]]");
        let content = page("/content").with_html("c");

        let merged = composer().merge(&[master], &content);
        assert_eq!(merged.html(), "c|c");
    }

    #[test]
    fn test_merge_name_and_description_latest_wins() {
        let master = page("/master")
            .with_name("Master")
            .with_description("Master description");
        let content = page("/content").with_name("Content");

        let merged = composer().merge(&[master], &content);
        assert_eq!(merged.name.as_deref(), Some("Content"));
        assert_eq!(merged.description.as_deref(), Some("Master description"));
    }

    #[test]
    fn test_merge_css_appends_in_order() {
        let master = page("/master").with_style("body{margin:0}");
        let content = page("/content").with_style("p{color:red}");

        let merged = composer().merge(&[master], &content);
        assert_eq!(merged.style(), "body{margin:0}p{color:red}");
    }

    #[test]
    fn test_merge_css_skips_layers_without_style() {
        let outer = page("/outer").with_style("a{}");
        let inner = page("/inner");
        let content = page("/content").with_style("b{}");

        let merged = composer().merge(&[outer, inner], &content);
        assert_eq!(merged.style(), "a{}b{}");
    }

    #[test]
    fn test_merge_references_keep_order_and_duplicates() {
        let master = page("/master")
            .with_reference(PageReference::stylesheet("/site.css"))
            .with_reference(PageReference::script("/site.js"));
        let content = page("/content")
            .with_reference(PageReference::stylesheet("/site.css"))
            .with_reference(PageReference::link("/feed"));

        let merged = composer().merge(&[master], &content);
        assert_eq!(
            merged.references,
            vec![
                PageReference::stylesheet("/site.css"),
                PageReference::script("/site.js"),
                PageReference::stylesheet("/site.css"),
                PageReference::link("/feed"),
            ]
        );
    }

    #[test]
    fn test_merge_identity_from_content() {
        let master = page("/master");
        let content = page("/content");

        let merged = composer().merge(&[master], &content);
        assert_eq!(merged.id, content.id);
        assert_eq!(merged.uri, "/content");
    }

    #[test]
    fn test_compile_requires_content_page() {
        let options = CompositionOptions {
            portal: Some(PortalRef::new(Uuid::new_v4())),
            ..Default::default()
        };
        let err = composer().compile(&options).unwrap_err();
        assert!(matches!(err, ComposeError::MissingRequiredInput("content page")));
    }

    #[test]
    fn test_compile_requires_portal() {
        let options = CompositionOptions {
            content_page: Some(page("/content")),
            ..Default::default()
        };
        let err = composer().compile(&options).unwrap_err();
        assert!(matches!(err, ComposeError::MissingRequiredInput("portal")));
    }

    #[test]
    fn test_compile_without_merge_flag_returns_content() {
        let content = page("/content").with_html("<p>[[slot]]</p>");
        let options = CompositionOptions::new(PortalRef::new(Uuid::new_v4()), content.clone())
            .with_master(page("/master").with_html("<div>[[slot]]</div>"));

        let result = composer().compile(&options).unwrap();
        assert_eq!(result.compiled_page, content);
        assert_eq!(result.content_page, content);
        assert_eq!(result.master_page.map(|p| p.uri), Some("/master".to_string()));
    }

    #[test]
    fn test_compile_with_merge_flag_but_no_masters() {
        let content = page("/content").with_html("<p>x</p>");
        let options = CompositionOptions::new(PortalRef::new(Uuid::new_v4()), content.clone())
            .with_flags(CompositionFlags::MERGE_MASTER_AND_CONTENT);

        let result = composer().compile(&options).unwrap();
        assert_eq!(result.compiled_page, content);
        assert!(result.master_page.is_none());
    }

    #[test]
    fn test_compile_reports_last_master() {
        let options = CompositionOptions::new(PortalRef::new(Uuid::new_v4()), page("/content"))
            .with_master(page("/outer").with_html("[[slot]]"))
            .with_master(page("/inner").with_html("[[slot]]"))
            .with_flags(CompositionFlags::MERGE_MASTER_AND_CONTENT);

        let result = composer().compile(&options).unwrap();
        assert_eq!(result.master_page.map(|p| p.uri), Some("/inner".to_string()));
    }

    #[test]
    fn test_custom_placeholder() {
        let composer =
            PageComposer::with_placeholder(composer().resolver().clone(), "<!--body-->").unwrap();
        let master = page("/master").with_html("<main><!--body--></main>");
        let content = page("/content").with_html("x");

        assert_eq!(composer.merge(&[master], &content).html(), "<main>x</main>");
    }

    #[test]
    fn test_empty_placeholder_rejected() {
        let result = PageComposer::with_placeholder(composer().resolver().clone(), "");
        assert!(matches!(result, Err(ComposeError::EmptyContentPlaceholder)));
    }
}
