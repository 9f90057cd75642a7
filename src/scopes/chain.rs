//! # Scope Chains
//!
//! A [`Scope`] is the lazily-evaluated handle returned by every scope call.
//! It borrows its host, accumulates merged options, and only touches data when
//! a terminal method (`to_vec`, `first`, `count`, `exists`) runs.
//!
//! ```rust
//! use query_scopes::models::{MemoryDatabase, MemoryModel};
//! use query_scopes::scopes::ScopeSource;
//! use serde_json::json;
//!
//! # fn example() -> query_scopes::Result<()> {
//! let db = MemoryDatabase::new();
//! db.insert("posts", json!({"title": "Hello", "published": true}))?;
//! let posts = MemoryModel::new(db, "posts");
//!
//! let published = posts
//!     .scoped()
//!     .r#where(json!({"published": true}))?
//!     .order("title")?
//!     .to_vec()?;
//! assert_eq!(published.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use super::generator::ScopeRegistry;
use super::options::QueryOptions;
use crate::error::{Result, ScopeError};
use serde_json::Value;
use tracing::trace;

/// Anything that owns a scope registry a chain can call into
pub trait ScopeSource {
    fn scopes(&self) -> &ScopeRegistry;

    /// Empty chain over this source
    fn scoped(&self) -> Scope<'_, Self>
    where
        Self: Sized,
    {
        Scope::new(self)
    }
}

/// A source that can execute merged options synchronously
pub trait QueryHost: ScopeSource {
    type Record;

    fn execute(&self, options: &QueryOptions) -> Result<Vec<Self::Record>>;
}

/// Positional arguments for a scope call
///
/// Rust has no variadics, so arities are spelled as `()`, a single value, a
/// tuple, an array, or a `Vec<Value>`.
pub trait IntoScopeArgs {
    fn into_scope_args(self) -> Vec<Value>;
}

impl IntoScopeArgs for () {
    fn into_scope_args(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoScopeArgs for Vec<Value> {
    fn into_scope_args(self) -> Vec<Value> {
        self
    }
}

impl<const N: usize> IntoScopeArgs for [Value; N] {
    fn into_scope_args(self) -> Vec<Value> {
        self.into()
    }
}

macro_rules! single_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoScopeArgs for $ty {
                fn into_scope_args(self) -> Vec<Value> {
                    vec![Value::from(self)]
                }
            }
        )*
    };
}

single_arg!(Value, &str, String, bool, i32, i64, u32, u64, f64);

macro_rules! tuple_args {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> IntoScopeArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_scope_args(self) -> Vec<Value> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_args!(A);
tuple_args!(A, B);
tuple_args!(A, B, C);
tuple_args!(A, B, C, D);

/// Chainable, lazily-evaluated options over a host
#[derive(Debug)]
pub struct Scope<'h, H: ?Sized> {
    host: &'h H,
    options: QueryOptions,
}

impl<H: ?Sized> Clone for Scope<'_, H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host,
            options: self.options.clone(),
        }
    }
}

macro_rules! named_scopes {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            #[doc = concat!("Apply the `", $name, "` scope")]
            pub fn $method(self, args: impl IntoScopeArgs) -> Result<Self> {
                self.invoke($name, args)
            }
        )*
    };
}

impl<'h, H: ScopeSource + ?Sized> Scope<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            options: QueryOptions::new(),
        }
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn into_options(self) -> QueryOptions {
        self.options
    }

    /// Call the scope registered under `name` and merge its fragment
    pub fn invoke(self, name: &str, args: impl IntoScopeArgs) -> Result<Self> {
        let args = args.into_scope_args();
        let fragment = self
            .host
            .scopes()
            .call(name, &args)
            .ok_or_else(|| ScopeError::UnknownScope {
                name: name.to_string(),
            })?;

        trace!(scope = %name, arity = args.len(), fragment = %fragment, "Scope invoked");

        match fragment {
            Value::Object(map) => Ok(self.merge(QueryOptions::from(map))),
            other => Err(ScopeError::invalid_option(
                name,
                format!("expected an options mapping, got {other}"),
            )),
        }
    }

    /// Merge already-built options, later keys winning
    pub fn merge(mut self, options: QueryOptions) -> Self {
        self.options.merge(options);
        self
    }

    named_scopes! {
        conditions => "conditions",
        order => "order",
        group => "group",
        having => "having",
        limit => "limit",
        offset => "offset",
        joins => "joins",
        select => "select",
        from => "from",
        include => "include",
        r#where => "where",
        with => "with",
        readonly => "readonly",
        lock => "lock",
        all => "all",
    }
}

impl<H: QueryHost + ?Sized> Scope<'_, H> {
    pub fn to_vec(&self) -> Result<Vec<H::Record>> {
        self.host.execute(&self.options)
    }

    pub fn first(&self) -> Result<Option<H::Record>> {
        Ok(self.host.execute(&self.options)?.into_iter().next())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.host.execute(&self.options)?.len())
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(self.count()? > 0)
    }
}
