//! Fixed-size vector and quaternion payload value types.
//!
//! These exist purely as byte-level conveniences for callers persisting
//! geometric fields; the codec itself treats them as opaque runs of
//! little-endian `f32`s. No math is provided or wanted here.

macro_rules! io_value_type {
    ($(#[$doc:meta])* $name:ident { $($field:ident),+ }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $(
                #[doc = concat!("`", stringify!($field), "` component.")]
                pub $field: f32,
            )+
        }

        impl $name {
            /// Encoded size in bytes.
            pub const SIZE: usize = [$(stringify!($field)),+].len() * 4;

            /// Wire encoding: components in declaration order, each a
            /// little-endian `f32`.
            pub fn encode(&self) -> [u8; Self::SIZE] {
                let mut out = [0u8; Self::SIZE];
                let mut at = 0;
                $(
                    out[at..at + 4].copy_from_slice(&self.$field.to_le_bytes());
                    at += 4;
                )+
                let _ = at;
                out
            }

            /// Parse from the wire encoding.
            pub fn decode(bytes: [u8; Self::SIZE]) -> Self {
                let mut at = 0;
                $(
                    let $field = f32::from_le_bytes([
                        bytes[at],
                        bytes[at + 1],
                        bytes[at + 2],
                        bytes[at + 3],
                    ]);
                    at += 4;
                )+
                let _ = at;
                Self { $($field),+ }
            }
        }
    };
}

io_value_type! {
    /// Two-component vector payload.
    Vector2 { x, y }
}

io_value_type! {
    /// Three-component vector payload.
    Vector3 { x, y, z }
}

io_value_type! {
    /// Four-component vector payload.
    Vector4 { x, y, z, w }
}

io_value_type! {
    /// Quaternion payload, stored x, y, z, w.
    Quaternion { x, y, z, w }
}
