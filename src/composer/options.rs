//! Composition inputs and outputs

use bitflags::bitflags;
use crm_pages_types::{Page, PortalRef};
use crm_templates::PropertyMap;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Steps the composer runs.
    ///
    /// ```
    /// use crm_pages::CompositionFlags;
    ///
    /// let flags = CompositionFlags::MERGE_MASTER_AND_CONTENT
    ///     | CompositionFlags::INTERPOLATE_HTML_CONTENT;
    /// assert!(flags.contains(CompositionFlags::MERGE_MASTER_AND_CONTENT));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CompositionFlags: u8 {
        /// Fold master pages and the content page into one page.
        const MERGE_MASTER_AND_CONTENT = 1 << 0;
        /// Resolve placeholders in the compiled HTML.
        const INTERPOLATE_HTML_CONTENT = 1 << 1;
        /// Resolve placeholders in the compiled CSS.
        const INTERPOLATE_STYLE_CONTENT = 1 << 2;
    }
}

impl Default for CompositionFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Everything [`crate::PageComposer::compile`] needs for one page
#[derive(Debug, Clone, Default)]
pub struct CompositionOptions {
    /// Owning portal; required
    pub portal: Option<PortalRef>,
    /// Innermost page; required
    pub content_page: Option<Page>,
    /// Master pages, outermost first
    pub master_pages: Vec<Page>,
    /// Namespace → model object for interpolation
    pub properties: PropertyMap,
    pub flags: CompositionFlags,
}

impl CompositionOptions {
    pub fn new(portal: PortalRef, content_page: Page) -> Self {
        Self {
            portal: Some(portal),
            content_page: Some(content_page),
            ..Default::default()
        }
    }

    /// Append a master page inside the ones already added
    pub fn with_master(mut self, page: Page) -> Self {
        self.master_pages.push(page);
        self
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_flags(mut self, flags: CompositionFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Output of one compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionResult {
    /// Last (innermost) master page supplied, if any
    pub master_page: Option<Page>,
    /// The content page as supplied
    pub content_page: Page,
    /// The merged and/or interpolated page
    pub compiled_page: Page,
}
