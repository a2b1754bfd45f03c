//! Pre-rendered background pages that surround the quotation page.

use std::path::PathBuf;

use super::DocumentError;

pub const DEFAULT_PAGES_BEFORE: [u32; 5] = [1, 2, 3, 4, 5];
pub const DEFAULT_PAGES_AFTER: [u32; 3] = [7, 8, 9];
pub const DEFAULT_EXTENSION: &str = "jpg";

/// A static page resolved to a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    pub index: u32,
    pub path: PathBuf,
}

impl StaticPage {
    /// Name the image is given inside the compile directory.
    pub fn asset_name(&self) -> String {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_EXTENSION);
        format!("page-{}.{}", self.index, ext)
    }
}

/// Where the background images live and which positions go before and
/// after the quotation page. Images are named `<index>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPageLayout {
    pub dir: PathBuf,
    pub extension: String,
    pub before: Vec<u32>,
    pub after: Vec<u32>,
}

impl StaticPageLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            before: DEFAULT_PAGES_BEFORE.to_vec(),
            after: DEFAULT_PAGES_AFTER.to_vec(),
        }
    }

    pub fn with_pages(mut self, before: Vec<u32>, after: Vec<u32>) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn path_for(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{}.{}", index, self.extension))
    }

    fn resolve(&self, index: u32) -> Result<StaticPage, DocumentError> {
        let path = self.path_for(index);
        if !path.is_file() {
            return Err(DocumentError::MissingStaticPage { index, path });
        }
        Ok(StaticPage { index, path })
    }

    /// Resolve the pages shown before the quotation page, in order.
    pub fn resolve_before(&self) -> Result<Vec<StaticPage>, DocumentError> {
        self.before.iter().map(|&i| self.resolve(i)).collect()
    }

    /// Resolve the pages shown after the quotation page, in order.
    pub fn resolve_after(&self) -> Result<Vec<StaticPage>, DocumentError> {
        self.after.iter().map(|&i| self.resolve(i)).collect()
    }

    /// Report every configured page whose image is missing.
    pub fn missing_pages(&self) -> Vec<(u32, PathBuf)> {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(|&i| (i, self.path_for(i)))
            .filter(|(_, path)| !path.is_file())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolves_existing_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for i in [3, 1, 2] {
            fs::write(dir.path().join(format!("{i}.png")), b"img").unwrap();
        }
        let layout = StaticPageLayout::new(dir.path())
            .with_extension("png")
            .with_pages(vec![2, 1], vec![3]);

        let before = layout.resolve_before().unwrap();
        assert_eq!(before.iter().map(|p| p.index).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(before[0].asset_name(), "page-2.png");
        assert_eq!(layout.resolve_after().unwrap()[0].index, 3);
        assert!(layout.missing_pages().is_empty());
    }

    #[test]
    fn test_missing_page_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.jpg"), b"img").unwrap();
        let layout = StaticPageLayout::new(dir.path()).with_pages(vec![1, 2], vec![]);

        match layout.resolve_before() {
            Err(DocumentError::MissingStaticPage { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected missing page error, got {:?}", other),
        }
        assert_eq!(layout.missing_pages().len(), 1);
    }
}
