//! Typed cache keys.
//!
//! Each statistics category declares a unit struct carrying its category
//! label and parameter format, so call sites cannot mix up the composition
//! order or the separator.

/// A cache key for one statistics category.
///
/// `key_for` composes the final key as `"{user_id}:{category}:{params}"`
/// via [`crate::generate_key`].
pub trait StatCacheKey {
    type Args<'r>;

    fn category(&self) -> &'static str;

    fn params(&self, args: Self::Args<'_>) -> String;

    fn key_for(&self, user_id: &str, args: Self::Args<'_>) -> String {
        crate::generate_key(user_id, self.category(), &self.params(args))
    }
}

#[macro_export]
macro_rules! stat_cache_key {
    ($name:ident => $category:literal, $params_fmt:literal[$($arg:ident: $ty:ty),*]) => {
        #[doc = concat!("Cache key for the `", $category, "` category, params `", $params_fmt, "`")]
        pub struct $name;

        impl $crate::key::StatCacheKey for $name {
            type Args<'r> = ($(&'r $ty,)*);

            fn category(&self) -> &'static str { $category }

            fn params(&self, args: Self::Args<'_>) -> String {
                let ($($arg,)*) = args;
                format!($params_fmt, $($arg),*)
            }
        }
    };
    ($name:ident => $category:literal) => {
        #[doc = concat!("Cache key for the `", $category, "` category")]
        pub struct $name;

        impl $crate::key::StatCacheKey for $name {
            type Args<'r> = ();

            fn category(&self) -> &'static str { $category }

            fn params(&self, _: Self::Args<'_>) -> String { String::new() }
        }
    };
}
