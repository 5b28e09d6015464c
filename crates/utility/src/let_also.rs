/// Scope function for keeping builder chains flowing.
pub trait LetAlso: Sized {
    /// Passes `self` by value into `f` and returns its result.
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> LetAlso for T {}
