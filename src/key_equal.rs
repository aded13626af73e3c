/// Decides whether two keys are the same element of a set.
///
/// Implementations must agree with the hash strategy: keys that compare equal
/// must hash to the same value.
///
/// # Examples
///
/// ```rust
/// use probe_set::KeyEqual;
///
/// #[derive(Clone, Copy, Default)]
/// struct IgnoreAsciiCase;
///
/// impl KeyEqual<String> for IgnoreAsciiCase {
///     fn equal(&self, a: &String, b: &String) -> bool {
///         a.eq_ignore_ascii_case(b)
///     }
/// }
///
/// assert!(IgnoreAsciiCase.equal(&"Sprite".to_string(), &"SPRITE".to_string()));
/// ```
pub trait KeyEqual<T: ?Sized> {
    /// Returns `true` if `a` and `b` are the same key.
    fn equal(&self, a: &T, b: &T) -> bool;
}

/// Key equality through [`Eq`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultKeyEqual;

impl<T> KeyEqual<T> for DefaultKeyEqual
where
    T: Eq + ?Sized,
{
    #[inline]
    fn equal(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

impl<T, E> KeyEqual<T> for &E
where
    T: ?Sized,
    E: KeyEqual<T> + ?Sized,
{
    #[inline]
    fn equal(&self, a: &T, b: &T) -> bool {
        (**self).equal(a, b)
    }
}
