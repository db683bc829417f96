//! Client-side harness for the `aixblock` program.
//!
//! A run builds a [`Provider`] from the ambient environment, resolves the
//! program from its IDL through a [`Workspace`], builds a typed
//! [`MethodCall`] and hands it to a [`Transport`] for submission.

pub mod error;
pub mod methods;
pub mod provider;
pub mod smoke;
pub mod transport;
pub mod workspace;

pub use error::{HarnessError, Result};
pub use methods::{MethodCall, Methods};
pub use provider::Provider;
pub use transport::{submit, LiteSvmTransport, RpcTransport, Transport};
pub use workspace::{MethodSpec, ProgramHandle, Workspace};
