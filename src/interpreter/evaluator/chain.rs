use crate::interpreter::{
    evaluator::core::over_applied,
    value::{
        frame::Frame,
        func::{Chain, Func, Link, Pattern},
        scope::Scope,
    },
};

impl Chain {
    /// Evaluates the chain.
    ///
    /// The first segment is evaluated on its own. Every later segment is
    /// called with the running value as its single argument:
    ///
    /// - `->` replaces the running value with the segment's result.
    /// - `--` runs the segment for its effects and keeps the running value,
    ///   unless the segment fails.
    /// - `-|` only runs while the running value is an error, and replaces it.
    ///
    /// While the running value is an error, every segment other than `-|` is
    /// skipped. A slot matches the segment's own result against its pattern
    /// and binds the names for the segments after it. A failed match
    /// replaces the result with the error.
    pub(crate) fn call(&self, frame: &Frame, args: &[Func]) -> Func {
        let Some((first, rest)) = self.pieces.split_first() else {
            return Func::from(Vec::new());
        };

        if let Err(failure) = frame.check() {
            return failure.into();
        }

        let mut scope = frame.scope().clone();
        let mut running = bind_slot(first.slot.as_ref(), first.expr.call(frame, &[]), frame, &mut scope);

        for piece in rest {
            if let Err(failure) = frame.check() {
                return failure.into();
            }

            let recovering = piece.link == Link::Recover;
            if running.is_error() != recovering {
                continue;
            }

            let inner = frame.with_scope(scope.clone());
            let output = piece.expr.call(&inner, &[running.clone()]);
            let output = bind_slot(piece.slot.as_ref(), output, &inner, &mut scope);

            if piece.link != Link::Ignored || output.is_error() {
                running = output;
            }
        }

        over_applied(running, frame, args)
    }
}

/// Binds `output` to `slot` in `scope`, returning the output or the error of
/// a failed match. Error outputs only bind to plain names.
fn bind_slot(slot: Option<&Pattern>, output: Func, frame: &Frame, scope: &mut Scope) -> Func {
    let Some(slot) = slot else {
        return output;
    };
    if output.is_error() && !matches!(slot, Pattern::Name(_)) {
        return output;
    }

    match slot.bind(&output, frame) {
        Ok(bound) => {
            *scope = scope.add_all(bound);
            output
        },
        Err(error) => error,
    }
}
