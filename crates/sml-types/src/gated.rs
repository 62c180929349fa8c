/// Result of an operation behind an administrative feature toggle.
///
/// `Disabled` is not an error: the HTTP layer passes such requests through
/// to the next handler as if the route did not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gated<T> {
    Served(T),
    Disabled,
}

impl<T> Gated<T> {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn served(self) -> Option<T> {
        match self {
            Self::Served(value) => Some(value),
            Self::Disabled => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Gated<U> {
        match self {
            Self::Served(value) => Gated::Served(f(value)),
            Self::Disabled => Gated::Disabled,
        }
    }
}
