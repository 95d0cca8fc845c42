//! Call instrumentation recorded in the key-value store
//!
//! A tracked method is identified by its qualified name (`Type::method`):
//!
//! | key                | holds                                    |
//! |--------------------|------------------------------------------|
//! | `{name}`           | number of calls                          |
//! | `{name}:inputs`    | list of call inputs, in call order       |
//! | `{name}:outputs`   | list of call outputs, in call order      |
//!
//! The wrappers compose: `call_history(.., count_calls(.., call))` records
//! the input, bumps the counter, runs the call, then records the output.

use std::fmt::Display;
use std::future::Future;
use storekit_core::{KeyValueStore, Result};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodKeys {
    pub calls: String,
    pub inputs: String,
    pub outputs: String,
}

impl MethodKeys {
    pub fn new(qualified_name: &str) -> Self {
        Self {
            calls: qualified_name.to_string(),
            inputs: format!("{}:inputs", qualified_name),
            outputs: format!("{}:outputs", qualified_name),
        }
    }
}

/// Increment the call counter of `method`, then run `call`.
pub async fn count_calls<T, F>(store: &dyn KeyValueStore, method: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let calls = store.incr(&MethodKeys::new(method).calls).await?;
    debug!("{} call #{}", method, calls);
    call.await
}

/// Append `input` to the inputs list, run `call`, append its output.
///
/// A failed call leaves its input recorded without a matching output.
pub async fn call_history<T, F>(
    store: &dyn KeyValueStore,
    method: &str,
    input: &str,
    call: F,
) -> Result<T>
where
    T: Display,
    F: Future<Output = Result<T>>,
{
    let keys = MethodKeys::new(method);

    store.rpush(&keys.inputs, input.as_bytes()).await?;
    let output = call.await?;
    store
        .rpush(&keys.outputs, output.to_string().as_bytes())
        .await?;

    Ok(output)
}
