// Copyright (c) 2024 Botho Foundation

//! Shared plumbing for the fixed-width byte types: raw access, hex text
//! form, and the quoted-hex JSON form.

macro_rules! impl_hex_bytes {
    ($name:ident, $len:expr) => {
        impl $name {
            /// Width of the value in bytes.
            pub const LEN: usize = $len;

            /// Wrap raw bytes.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Borrow the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Copy out the raw bytes.
            pub fn to_bytes(&self) -> [u8; $len] {
                self.0
            }

            /// True unless every byte is zero.
            pub fn has_value(&self) -> bool {
                self.0.iter().any(|b| *b != 0)
            }

            pub(crate) fn decode_hex_exact(s: &str) -> Result<Self, $crate::KeyError> {
                let raw = hex::decode(s)?;
                Self::try_from(&raw[..])
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = $crate::KeyError;

            fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
                if src.len() != $len {
                    return Err($crate::KeyError::LengthMismatch($len, src.len()));
                }
                let mut out = [0u8; $len];
                out.copy_from_slice(src);
                Ok(Self(out))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(src: [u8; $len]) -> Self {
                Self(src)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                for d in self.0.iter() {
                    write!(f, "{d:02x}")?;
                }
                Ok(())
            }
        }

        impl core::fmt::LowerHex for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(self, f)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&hex::encode(self.0))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                Self::decode_hex_exact(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}
