//! Shared primitives for the quote and chat workspace crates.
//!
//! ```rust
//! use pcommon::{GenerationOptions, SessionId};
//!
//! let session = SessionId::from("chat-1");
//! let options = GenerationOptions::default().with_max_tokens(1024);
//!
//! assert_eq!(session.as_str(), "chat-1");
//! assert_eq!(options.max_tokens, Some(1024));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use pcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Identifier newtypes shared across crates.
    //!
    //! ```rust
    //! use pcommon::SessionId;
    //!
    //! let first = SessionId::generate();
    //! let second = SessionId::generate();
    //! assert_ne!(first, second);
    //! assert!(first.as_str().starts_with("chat-"));
    //! ```

    use std::fmt::{Display, Formatter};
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        /// Allocates a process-unique id of the form `chat-<n>`.
        pub fn generate() -> Self {
            let next = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
            Self(format!("chat-{next}"))
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Generation settings shared by vendor request builders.
    //!
    //! ```rust
    //! use pcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default().with_max_tokens(128);
    //!
    //! assert_eq!(options.max_tokens, Some(128));
    //! assert_eq!(options.max_tokens_or(1024), 128);
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GenerationOptions {
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }

        pub fn max_tokens_or(&self, fallback: u32) -> u32 {
            self.max_tokens.unwrap_or(fallback)
        }
    }
}

pub use context::SessionId;
pub use future::BoxFuture;
pub use model::GenerationOptions;
