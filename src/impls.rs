/*!
Implementations of the [`value`][crate::value] traits for various primitive
and standard library types
 */

use crate::value::{ParsedValue, Value, ValueError, ValueKind};

macro_rules! from_str {
    ($(
        $type:ident $($(::$path:ident)+,)?
    )*) => {
        $(
            impl ParsedValue for $type $($(:: $path)+)? {}
        )*
    };
}

from_str! {
    u8 u16 u32 u64 u128 usize
    i8 i16 i32 i64 i128 isize
    f32 f64
    char

    std::string::String,
    std::path::PathBuf,
    std::ffi::OsString,

    core::net::Ipv4Addr,
    core::net::Ipv6Addr,
    core::net::IpAddr,
    core::net::SocketAddrV4,
    core::net::SocketAddrV6,
    core::net::SocketAddr,
}

/// `bool` is the flag type. Positional `bool` fields still go through this
/// constructor, so they accept the literal tokens `true` and `false`.
impl Value for bool {
    const KIND: ValueKind = ValueKind::Flag;

    #[inline]
    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        arg.parse().map_err(ValueError::new)
    }
}
