//! Macros for declarative props schemas

/// Declare a props schema
///
/// # Examples
///
/// ```rust
/// use pagewright::{schema, FieldType};
///
/// let schema = schema! {
///     title: String,
///     subtitle?: String,
///     established?: Date
/// };
/// assert_eq!(schema.fields.len(), 3);
/// assert_eq!(schema.fields[2].field_type, FieldType::Date);
/// ```
#[macro_export]
macro_rules! schema {
    // Type mappings
    (@type String) => { $crate::FieldType::String };
    (@type Number) => { $crate::FieldType::Number };
    (@type Boolean) => { $crate::FieldType::Boolean };
    (@type Date) => { $crate::FieldType::Date };

    (@parse $builder:expr $(,)?) => { $builder };

    (@parse $builder:expr, $name:ident: $type:ident $(, $($rest:tt)*)?) => {
        $crate::schema!(
            @parse $builder.field(stringify!($name), $crate::schema!(@type $type))
            $(, $($rest)*)?
        )
    };

    (@parse $builder:expr, $name:ident ?: $type:ident $(, $($rest:tt)*)?) => {
        $crate::schema!(
            @parse $builder.optional(stringify!($name), $crate::schema!(@type $type))
            $(, $($rest)*)?
        )
    };

    {} => {
        $crate::Schema::new()
    };

    ($($fields:tt)+) => {
        $crate::schema!(@parse $crate::Schema::builder(), $($fields)+).build()
    };
}
