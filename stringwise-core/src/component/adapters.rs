//! The wrapper types behind the [`Component`] combinators.

use std::{error::Error as StdError, marker::PhantomData};

use super::Component;

/// Two stages run back to back; the first error stops the pipeline.
pub(super) struct Then<First, Second> {
    pub(super) first: First,
    pub(super) second: Second,
}

impl<First, Second> Component for Then<First, Second>
where
    First: Component,
    Second: Component<Input = First::Output, Error = First::Error>,
{
    type Input = First::Input;
    type Output = Second::Output;
    type Error = First::Error;

    fn call(&self, input: First::Input) -> Result<Second::Output, First::Error> {
        self.first
            .call(input)
            .and_then(|handoff| self.second.call(handoff))
    }
}

/// A stage embedded in a larger request/response shape.
///
/// `extract` borrows the outer input; `merge` gets it back by value together
/// with the stage's output.
pub(super) struct Embedded<C, Extract, Merge, Outer, Merged> {
    pub(super) inner: C,
    pub(super) extract: Extract,
    pub(super) merge: Merge,
    pub(super) shape: PhantomData<fn(Outer) -> Merged>,
}

impl<C, Extract, Merge, Outer, Merged> Component for Embedded<C, Extract, Merge, Outer, Merged>
where
    C: Component,
    Extract: Fn(&Outer) -> C::Input,
    Merge: Fn(Outer, C::Output) -> Merged,
{
    type Input = Outer;
    type Output = Merged;
    type Error = C::Error;

    fn call(&self, outer: Outer) -> Result<Merged, C::Error> {
        let output = self.inner.call((self.extract)(&outer))?;
        Ok((self.merge)(outer, output))
    }
}

/// A stage whose error is converted on the way out.
pub(super) struct ErrInto<C, Convert, E> {
    pub(super) inner: C,
    pub(super) convert: Convert,
    pub(super) error: PhantomData<fn() -> E>,
}

impl<C, Convert, E> Component for ErrInto<C, Convert, E>
where
    C: Component,
    Convert: Fn(C::Error) -> E,
    E: StdError + Send + Sync + 'static,
{
    type Input = C::Input;
    type Output = C::Output;
    type Error = E;

    fn call(&self, input: C::Input) -> Result<C::Output, E> {
        self.inner.call(input).map_err(&self.convert)
    }
}

/// A stage with observers on its input and on its successful output.
pub(super) struct Observed<C, OnInput, OnOutput> {
    pub(super) inner: C,
    pub(super) on_input: OnInput,
    pub(super) on_output: OnOutput,
}

impl<C, OnInput, OnOutput> Component for Observed<C, OnInput, OnOutput>
where
    C: Component,
    OnInput: Fn(&C::Input),
    OnOutput: Fn(&C::Output),
{
    type Input = C::Input;
    type Output = C::Output;
    type Error = C::Error;

    fn call(&self, input: C::Input) -> Result<C::Output, C::Error> {
        (self.on_input)(&input);
        self.inner.call(input).inspect(|output| (self.on_output)(output))
    }
}
