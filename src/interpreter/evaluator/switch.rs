use crate::interpreter::{
    evaluator::core::over_applied,
    value::{
        frame::Frame,
        func::{Func, Switch},
    },
};

impl Switch {
    /// Evaluates the switch.
    ///
    /// Both sides of a case are evaluated first and their results then
    /// called with the subject, so `> 0` tests `0 > subject` and `+ 1` yields
    /// `1 + subject`. Plain values ignore the subject.
    ///
    /// The first case whose left-hand side yields `true`, or a plain value
    /// equal to the subject, selects its right-hand side. When no case
    /// matches, the subject itself is returned.
    pub(crate) fn call(&self, frame: &Frame, args: &[Func]) -> Func {
        let subject = self.subject.call(frame, &[]);
        if subject.is_error() {
            return subject;
        }

        for (lhs, rhs) in &self.cases {
            if let Err(failure) = frame.check() {
                return failure.into();
            }

            let test = with_subject(lhs, &subject, frame);
            let matched = match &test {
                Func::Bool(b) => *b,
                Func::Error(_) => return test,
                other => other.is_value() && other.equals(&subject),
            };

            if matched {
                return over_applied(with_subject(rhs, &subject, frame), frame, args);
            }
        }

        over_applied(subject, frame, args)
    }
}

/// Evaluates `side` and calls its result with the subject.
fn with_subject(side: &Func, subject: &Func, frame: &Frame) -> Func {
    let value = side.call(frame, &[]);
    if value.is_error() {
        return value;
    }
    value.call(frame, std::slice::from_ref(subject))
}
