//! Declarative helpers for the flat numeric fundamentals records.

/// Declares a flat `f64` record whose fields each carry a key-statistics
/// label. The label order is the column order of the key-statistics sheet.
macro_rules! labelled_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident => $label:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                #[serde(default)]
                pub $field: f64,
            )+
        }

        impl $name {
            /// Key-statistics labels, in column order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Field names, in column order.
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Field values, in column order.
            #[must_use]
            pub fn values(&self) -> Vec<f64> {
                vec![$(self.$field),+]
            }

            /// Assign the field carrying `label`.
            ///
            /// Returns `false` when the label belongs to no field of this record.
            pub fn set(&mut self, label: &str, value: f64) -> bool {
                match label {
                    $($label => {
                        self.$field = value;
                        true
                    })+
                    _ => false,
                }
            }
        }
    };
}
