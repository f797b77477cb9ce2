//! Fail-fast parallel joins over blocking calls.
//!
//! Every task is started on its own scoped thread and every task is awaited;
//! the join then yields all results in task order, or the error of the first
//! failing task in task order. There is no cancellation: a stalled task stalls
//! the join.

use std::any::Any;
use std::thread;

use crate::error::KiraError;

pub fn try_join_all<T, F>(tasks: Vec<F>) -> Result<Vec<T>, KiraError>
where
    F: FnOnce() -> Result<T, KiraError> + Send,
    T: Send,
{
    thread::scope(|scope| {
        let handles = tasks
            .into_iter()
            .map(|task| scope.spawn(task))
            .collect::<Vec<_>>();

        let mut results = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for handle in handles {
            let outcome = handle
                .join()
                .map_err(|payload| KiraError::TaskPanicked(panic_message(payload)))
                .and_then(|result| result);
            match outcome {
                Ok(value) => results.push(value),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(results),
        }
    })
}

/// Two heterogeneous tasks joined with the same policy as [`try_join_all`].
pub fn try_join<A, B, FA, FB>(left: FA, right: FB) -> Result<(A, B), KiraError>
where
    FA: FnOnce() -> Result<A, KiraError> + Send,
    FB: FnOnce() -> Result<B, KiraError> + Send,
    A: Send,
    B: Send,
{
    thread::scope(|scope| {
        let left = scope.spawn(left);
        let right = scope.spawn(right);
        let left = left
            .join()
            .map_err(|payload| KiraError::TaskPanicked(panic_message(payload)));
        let right = right
            .join()
            .map_err(|payload| KiraError::TaskPanicked(panic_message(payload)));
        Ok((left??, right??))
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return message.to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}
