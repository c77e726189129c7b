//! Annotation Merge
//!
//! Folds a batch of freshly uploaded photo URLs into a unit's annotations.

use crate::domain::Annotation;

/// Merge `new_urls` into the annotation keyed by (`comment1`, `comment2`)
///
/// An existing annotation whose trimmed comments both match gets the
/// union of its URLs and `new_urls`, first-seen order kept. Otherwise a
/// new annotation is appended with the comments as given. Blank comments
/// are valid keys. Applying the same input twice changes nothing further.
pub fn merge_annotation(
    existing: &[Annotation],
    comment1: &str,
    comment2: &str,
    new_urls: &[String],
) -> Vec<Annotation> {
    let mut merged = existing.to_vec();

    match merged.iter_mut().find(|a| a.matches(comment1, comment2)) {
        Some(annotation) => annotation.add_urls(new_urls),
        None => {
            let mut annotation = Annotation::new(comment1, comment2);
            annotation.add_urls(new_urls);
            merged.push(annotation);
        }
    }

    merged
}
