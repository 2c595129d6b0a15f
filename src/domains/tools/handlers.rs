//! Tool handlers.
//!
//! A service defines its tools with closures taking the service instance and
//! the validated positional [`Arguments`]. At registration the closure is
//! bound to the live instance and erased behind [`ToolHandler`], which is
//! all the executor needs to invoke it.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Validated arguments of one call, in declared parameter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    names: Vec<String>,
    values: Vec<Value>,
}

/// An argument could not be decoded into the type the handler asked for.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// No argument at this position.
    #[error("No argument at position {0}")]
    Missing(usize),

    /// The argument has the wrong shape for the requested type.
    #[error("Argument '{name}' could not be decoded: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Arguments {
    /// Build from parallel name and value lists.
    pub fn new(names: Vec<String>, values: Vec<Value>) -> Self {
        Self { names, values }
    }

    /// Decode the argument at `index`.
    ///
    /// Absent optional arguments are `null`, so ask for `Option<T>` there.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, ArgumentError> {
        let value = self.values.get(index).ok_or(ArgumentError::Missing(index))?;
        serde_json::from_value(value.clone()).map_err(|source| ArgumentError::Decode {
            name: self.name(index).unwrap_or_default().to_string(),
            source,
        })
    }

    /// The raw argument at `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The parameter name at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw values, in order.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// A callable tool body, already bound to its service instance.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Invoke the tool with validated arguments.
    async fn call(&self, arguments: Arguments) -> anyhow::Result<Value>;
}

/// Type-erased method of service `S`.
pub(crate) type MethodFn<S> =
    Arc<dyn Fn(Arc<S>, Arguments) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Erase an async method.
pub(crate) fn erase_async<S, F, Fut, R, E>(f: F) -> MethodFn<S>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Serialize + Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    Arc::new(move |instance: Arc<S>, arguments: Arguments| {
        let fut = f(instance, arguments);
        async move {
            let output = fut.await.map_err(|e| -> anyhow::Error { e.into() })?;
            Ok::<_, anyhow::Error>(serde_json::to_value(output)?)
        }
        .boxed()
    })
}

/// Erase a synchronous method.
pub(crate) fn erase_sync<S, F, R, E>(f: F) -> MethodFn<S>
where
    S: Send + Sync + 'static,
    F: Fn(&S, Arguments) -> Result<R, E> + Send + Sync + 'static,
    R: Serialize + Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    let f = Arc::new(f);
    Arc::new(move |instance: Arc<S>, arguments: Arguments| {
        let f = f.clone();
        async move {
            let output = f(instance.as_ref(), arguments).map_err(|e| -> anyhow::Error { e.into() })?;
            Ok::<_, anyhow::Error>(serde_json::to_value(output)?)
        }
        .boxed()
    })
}

/// A method bound to the instance it was registered with.
pub(crate) struct BoundMethod<S> {
    instance: Arc<S>,
    method: MethodFn<S>,
}

impl<S> BoundMethod<S> {
    pub(crate) fn new(instance: Arc<S>, method: MethodFn<S>) -> Self {
        Self { instance, method }
    }
}

#[async_trait::async_trait]
impl<S> ToolHandler for BoundMethod<S>
where
    S: Send + Sync + 'static,
{
    async fn call(&self, arguments: Arguments) -> anyhow::Result<Value> {
        (self.method)(self.instance.clone(), arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Counter {
        base: i64,
    }

    #[test]
    fn test_arguments_decode() {
        let args = Arguments::new(
            vec!["a".into(), "b".into()],
            vec![json!(2), Value::Null],
        );
        assert_eq!(args.get::<i64>(0).unwrap(), 2);
        assert_eq!(args.get::<Option<String>>(1).unwrap(), None);
        assert!(matches!(args.get::<i64>(5), Err(ArgumentError::Missing(5))));

        let err = args.get::<String>(0).unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }

    #[tokio::test]
    async fn test_bound_async_method() {
        let method = erase_async(|svc: Arc<Counter>, args: Arguments| async move {
            let n: i64 = args.get(0)?;
            Ok::<_, anyhow::Error>(svc.base + n)
        });
        let bound = BoundMethod::new(Arc::new(Counter { base: 10 }), method);

        let out = bound
            .call(Arguments::new(vec!["n".into()], vec![json!(5)]))
            .await
            .unwrap();
        assert_eq!(out, json!(15));
    }

    #[tokio::test]
    async fn test_bound_sync_method_error() {
        let method = erase_sync(|_svc: &Counter, _args: Arguments| {
            Err::<i64, _>(anyhow::anyhow!("nope"))
        });
        let bound = BoundMethod::new(Arc::new(Counter { base: 0 }), method);

        let err = bound.call(Arguments::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
