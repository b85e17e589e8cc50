//! Macros for reducing boilerplate when defining entities

/// Lifecycle methods shared by every [`Entity`](crate::core::Entity)
/// implementation.
///
/// Expects the implementing struct to have `id: i32` and `mode: Mode`
/// fields. Use inside the `impl Entity for ...` block:
///
/// ```rust,ignore
/// impl Entity for Product {
///     const ENTITY_TYPE: &'static str = "product";
///     const RULES: &'static [FieldRules] = &[];
///
///     entity_lifecycle!();
///
///     // field_value, from_row, add_call, update_call ...
/// }
/// ```
#[macro_export]
macro_rules! entity_lifecycle {
    () => {
        fn id(&self) -> i32 {
            self.id
        }

        fn mode(&self) -> $crate::core::entity::Mode {
            self.mode
        }

        fn mark_persisted(&mut self, id: i32) {
            self.id = id;
            self.mode = $crate::core::entity::Mode::Update;
        }
    };
}

/// Status enum plumbing: numeric code conversions and `Display`.
///
/// ```rust,ignore
/// status_codes!(PhoneKind {
///     Mobile = 1 => "Mobile",
///     Home = 2 => "Home",
/// });
/// ```
#[macro_export]
macro_rules! status_codes {
    ($type:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        impl $type {
            pub fn code(self) -> u8 {
                self as u8
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let label = match self {
                    $(Self::$variant => $label,)+
                };
                f.write_str(label)
            }
        }
    };
}
