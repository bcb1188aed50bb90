use crate::{ResourceKind, TrellisError, TrellisResult};

/// A remotely identified entity that can be addressed by path segment.
pub trait Resource {
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn short_link(&self) -> Option<&str> {
        None
    }

    /// Human-friendly identifier used both for display and path matching:
    /// `name[shortLink]` when the entity has a short link, the bare name otherwise.
    fn identifier(&self) -> String {
        match self.short_link() {
            Some(link) if !link.is_empty() => format!("{}[{}]", self.name(), link),
            _ => self.name().to_string(),
        }
    }

    /// Exact match on ID, identifier or short link.
    fn matches_exactly(&self, query: &str) -> bool {
        query == self.id()
            || query == self.identifier()
            || self.short_link().is_some_and(|link| link == query)
    }
}

/// Finds the entity addressed by `query` in `items`.
///
/// Exact matches win over plain name matches; among equals the first item wins.
pub fn find_resource<T: Resource>(items: Vec<T>, query: &str) -> TrellisResult<T> {
    let position = items
        .iter()
        .position(|item| item.matches_exactly(query))
        .or_else(|| items.iter().position(|item| item.name() == query));

    match position {
        Some(index) => items.into_iter().nth(index).ok_or_else(|| {
            TrellisError::Internal(format!("{} index {} out of range", T::KIND, index))
        }),
        None => Err(TrellisError::not_found(T::KIND, query)),
    }
}
