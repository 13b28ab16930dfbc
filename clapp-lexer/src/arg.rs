use core::fmt::{self, Debug, Write};

/**
A single, raw token passed in from the command line.

This type is used in two ways: to indicate long option names, and to indicate
values themselves. For instance, given `-n 0.4 --mode=fast input.txt`, `0.4`,
`mode`, `fast`, and `input.txt` would all be passed as [`Arg`] values to the
relevant [`Visitor`][crate::Visitor] methods.

An [`Arg`] is just a byte slice, since that's what the OS gives us. Use
[`as_str`][Arg::as_str] to get at it as text.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arg<'arg>(&'arg [u8]);

impl<'arg> Arg<'arg> {
    #[inline]
    #[must_use]
    pub const fn new(bytes: &'arg [u8]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'arg [u8] {
        self.0
    }

    /// Get this argument as a `str`, if it's valid UTF-8
    #[inline]
    pub fn as_str(&self) -> Option<&'arg str> {
        core::str::from_utf8(self.0).ok()
    }
}

impl PartialEq<str> for Arg<'_> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Arg<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/**
Debug-print an arg. This implementation treats the arg as a string where it
can, and prints any invalid UTF-8 bytes in hex.
 */
impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
            f.write_char('[')?;

            let mut bytes = bytes.iter().copied();

            if let Some(b) = bytes.next() {
                write!(f, "{b:#x}")?;
                bytes.try_for_each(|b| write!(f, ",{b:#x}"))?;
            }

            f.write_char(']')
        }

        if self.0.is_empty() {
            return f.write_str("\"\"");
        }

        self.0.utf8_chunks().enumerate().try_for_each(|(i, chunk)| {
            if i > 0 {
                f.write_str("..")?;
            }

            match (chunk.valid(), chunk.invalid()) {
                (s, b"") => write!(f, "{s:?}"),
                ("", b) => write_bytes(f, b),
                (s, b) => {
                    write!(f, "{s:?}..")?;
                    write_bytes(f, b)
                }
            }
        })
    }
}
