/// Size of a machine word, the alignment every lent region is rounded to.
pub const WORD: usize = core::mem::size_of::<usize>();

/// Rounds the given size up to the machine word alignment.
///
/// Overflows for values within one word of `usize::MAX`; use
/// [`checked_align`] when the value comes from a caller.
///
/// # Examples
///
/// ```rust
/// use rarena::align;
///
/// match std::mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + ::core::mem::size_of::<usize>() - 1) & !(::core::mem::size_of::<usize>() - 1)
  };
}

/// Rounds `value` up to the machine word alignment, or `None` if the
/// rounded value does not fit in a `usize`.
pub const fn checked_align(value: usize) -> Option<usize> {
  match value.checked_add(WORD - 1) {
    Some(padded) => Some(padded & !(WORD - 1)),
    None => None,
  }
}
