use crate::log::{Log, severity::Severity};

/// Gets first refusal on every emission that passes the level gate.
///
/// Returning `true` means the message was fully handled and the normal
/// formatting and sink output is skipped for that one emission.
///
/// While `on_intercept` runs, the facade's interceptor slot is empty: logging
/// through `log` from inside the body never re-enters this interceptor. The
/// body may install a different interceptor with
/// [`Log::set_interceptor`](crate::log::Log::set_interceptor); that one stays
/// active after the body returns and also sees any emission the body makes
/// after installing it.
///
/// Any `Fn(&Log, Severity, &str, &str) -> bool` closure is an interceptor.
pub trait Interceptor: Send + Sync {
    fn on_intercept(&self, log: &Log, severity: Severity, tag: &str, message: &str) -> bool;
}

impl<F> Interceptor for F
where
    F: Fn(&Log, Severity, &str, &str) -> bool + Send + Sync,
{
    #[inline]
    fn on_intercept(&self, log: &Log, severity: Severity, tag: &str, message: &str) -> bool {
        self(log, severity, tag, message)
    }
}
