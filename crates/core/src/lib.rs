//! One-shot evaluation against a V8 inspector.
//!
//! The flow is: pick a [`Target`] from the listener with [`select_target`],
//! open a [`Session`] against it, [`evaluate`] a script resolved from a
//! [`ScriptSource`], and [`interpret`] the reply into a single output line.
//! Discovery and connect share one [`Deadline`].
//!
//! ```ignore
//! let devtools = DevTools::new("http://localhost:9229")?;
//! let deadline = Deadline::default();
//! let request = SelectionRequest::parse("auto", None)?;
//! let target = discover(&devtools, &request, &deadline).await?;
//! let session = Session::open(target, &deadline).await?;
//! let outcome = evaluate(&session, "process.version", None).await;
//! session.close().await;
//! println!("{}", interpret(outcome?)?);
//! ```

pub mod deadline;
pub mod error;
pub mod evaluate;
pub mod script;
pub mod session;
pub mod target;

pub use deadline::{DEFAULT_SETUP_TIMEOUT, Deadline};
pub use error::{Error, ErrorKind, Result};
pub use evaluate::{Evaluation, evaluate, interpret, render_value, unquote};
pub use probe_protocol::{Target, TargetKind};
pub use probe_runtime::DevTools;
pub use script::{EMBEDDED_SCRIPTS, EmbeddedScript, ScriptSource};
pub use session::Session;
pub use target::{Policy, SelectionRequest, TargetSource, TargetType, select_target};

/// Creates a discovery handle for `address` without performing I/O.
pub fn devtools(address: &str) -> Result<DevTools> {
	DevTools::new(address).map_err(Error::from_discovery)
}

/// Selects a target, bounded by `deadline`.
pub async fn discover<S>(source: &S, request: &SelectionRequest, deadline: &Deadline) -> Result<Target>
where
	S: TargetSource + ?Sized,
{
	deadline
		.run(select_target(source, request))
		.await
		.map_err(|e| Error::DiscoveryTimeout(e.0))?
}

/// Lists all targets, bounded by `deadline`.
pub async fn list_targets(devtools: &DevTools, deadline: &Deadline) -> Result<Vec<Target>> {
	deadline
		.run(devtools.list())
		.await
		.map_err(|e| Error::DiscoveryTimeout(e.0))?
		.map_err(Error::from_discovery)
}
