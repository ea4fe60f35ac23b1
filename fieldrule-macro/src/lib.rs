// Procedural macros for fieldrule
// Builds a record's descriptor table from `#[rule(...)]` field attributes

use proc_macro::TokenStream;

mod rule_check;
mod verify;

/// Derives `fieldrule::Verify` for a struct with named fields.
///
/// Each field may carry one or more `#[rule(...)]` attributes. Fields
/// without rules are left out of the descriptor table.
///
/// | Key                   | Rule             | Metadata            |
/// |-----------------------|------------------|---------------------|
/// | `required`            | non-empty value  | `message`           |
/// | `regx`                | pattern match    | `pattern\:message`  |
/// | `min_len` / `minLen`  | byte length `>=` | `length:message`    |
/// | `max_len` / `maxLen`  | byte length `<=` | `length:message`    |
/// | `lt`, `lte`           | upper bounds     | `bound:message`     |
/// | `gt`, `gte`           | lower bounds     | `bound:message`     |
///
/// # Examples
///
/// ```ignore
/// use fieldrule::Verify;
///
/// #[derive(Verify)]
/// struct Person {
///     #[rule(required = "用户名不能为空", min_len = "5:用户名最小长度不能小于5")]
///     name: String,
///     #[rule(required = "年龄不能为空", gte = "18:年龄应当大于18岁")]
///     age: i64,
///     #[rule(regx = "^hello:\\d{3,5}$\\:其他字段正则校验失败")]
///     other: String,
///     #[rule(required = "性别不能为空")]
///     gender: Option<bool>,
/// }
/// ```
///
/// Attaching a rule to a field type that cannot carry it (for example `lt`
/// on a `String`) is a compile error, as is metadata without a usable
/// separator.
#[proc_macro_derive(Verify, attributes(rule))]
pub fn derive_verify(input: TokenStream) -> TokenStream {
    verify::derive_verify_impl(input)
}
