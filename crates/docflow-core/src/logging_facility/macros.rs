//! Operation logging macros
//!
//! Every operation emits a `start` event and then exactly one of `end` or
//! `end_error`. All three carry `component` (the caller's module path), `op`
//! and `event`; extra fields are passed through to `tracing` unchanged.

#[doc(hidden)]
#[macro_export]
macro_rules! __docflow_op_event {
    ($level:ident, $op:expr, $event:ident, { $($field:tt)* }) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::docflow_core_types::schema::$event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use docflow_core::log_op_start;
/// log_op_start!("document.create");
/// log_op_start!("document.create", actor_id = 7);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__docflow_op_event!(info, $op, EVENT_START, { $($($field)*)? })
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// ```
/// # use docflow_core::log_op_end;
/// log_op_end!("document.create", duration_ms = 42, document_id = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__docflow_op_event!(info, $op, EVENT_END, {
            duration_ms = $duration,
            $($($field)*)?
        })
    };
}

/// Log a failed operation at error level
///
/// `$err` is anything convertible into `ExError` (including
/// `&WorkflowError`); its kind and stable code become `err_kind` and
/// `err_code`.
///
/// ```
/// # use docflow_core::{log_op_error, errors::WorkflowError};
/// let err = WorkflowError::invalid_transition("Only draft documents can be submitted");
/// log_op_error!("workflow.transition", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let classified: $crate::errors::ExError = ($err).into();
        $crate::__docflow_op_event!(error, $op, EVENT_END_ERROR, {
            duration_ms = $duration,
            err_kind = ?classified.kind(),
            err_code = classified.code(),
            $($($field)*)?
        })
    }};
}
