//! Photo Gallery
//!
//! Browsing state for an annotation's photos: a wrapping cursor plus the
//! stacked thumbnail preview.

/// Thumbnails shown stacked on a collapsed annotation
pub const THUMBNAIL_STACK: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    urls: Vec<String>,
    index: usize,
}

impl Gallery {
    /// Open on the first photo
    pub fn open(urls: &[String]) -> Self {
        Self {
            urls: urls.to_vec(),
            index: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.urls.get(self.index).map(String::as_str)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Navigation controls only make sense with more than one photo
    pub fn is_navigable(&self) -> bool {
        self.urls.len() > 1
    }

    /// Advance, wrapping past the last photo
    pub fn next(&mut self) {
        if !self.urls.is_empty() {
            self.index = (self.index + 1) % self.urls.len();
        }
    }

    /// Step back, wrapping past the first photo
    pub fn prev(&mut self) {
        if !self.urls.is_empty() {
            let len = self.urls.len();
            self.index = (self.index + len - 1) % len;
        }
    }

    /// Close and forget the photos
    pub fn close(&mut self) {
        self.urls.clear();
        self.index = 0;
    }
}

/// First few URLs shown as a stacked preview
pub fn thumbnails(urls: &[String]) -> &[String] {
    &urls[..urls.len().min(THUMBNAIL_STACK)]
}
