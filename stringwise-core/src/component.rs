mod adapters;

use std::{error::Error as StdError, marker::PhantomData};

/// One stage of a sizing calculation.
///
/// A stage turns a typed input into a typed output or fails with its own
/// error. Stages are pure: equal inputs give equal results and nothing is
/// remembered between calls.
///
/// Implementors only write [`call()`](Component::call). The provided methods
/// wrap a stage without changing it:
///
/// - [`chain()`](Component::chain) feeds one stage's output into the next;
///   both must share an error type.
/// - [`map()`](Component::map) embeds a stage in a larger request/response
///   shape.
/// - [`map_err()`](Component::map_err) converts the error type.
/// - [`inspect()`](Component::inspect) observes calls. The engine itself is
///   silent; callers attach logging this way.
pub trait Component {
    type Input;
    type Output;
    type Error: StdError + Send + Sync + 'static;

    /// Runs the stage.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the input is malformed or describes a
    /// configuration the stage cannot satisfy.
    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;

    /// Runs `next` on this stage's output.
    ///
    /// ```
    /// use std::convert::Infallible;
    /// use stringwise_core::Component;
    ///
    /// /// Series voltage of a string of identical modules.
    /// struct SeriesVoltage {
    ///     module_voltage: f64,
    /// }
    ///
    /// impl Component for SeriesVoltage {
    ///     type Input = u32;
    ///     type Output = f64;
    ///     type Error = Infallible;
    ///
    ///     fn call(&self, modules: u32) -> Result<f64, Infallible> {
    ///         Ok(f64::from(modules) * self.module_voltage)
    ///     }
    /// }
    ///
    /// /// Headroom left below a voltage ceiling.
    /// struct Headroom {
    ///     ceiling: f64,
    /// }
    ///
    /// impl Component for Headroom {
    ///     type Input = f64;
    ///     type Output = f64;
    ///     type Error = Infallible;
    ///
    ///     fn call(&self, voltage: f64) -> Result<f64, Infallible> {
    ///         Ok(self.ceiling - voltage)
    ///     }
    /// }
    ///
    /// let headroom = SeriesVoltage { module_voltage: 50.0 }.chain(Headroom { ceiling: 1000.0 });
    /// assert_eq!(headroom.call(18).unwrap(), 100.0);
    /// ```
    fn chain<Stage>(
        self,
        next: Stage,
    ) -> impl Component<Input = Self::Input, Output = Stage::Output, Error = Self::Error>
    where
        Self: Sized,
        Stage: Component<Input = Self::Output, Error = Self::Error>,
    {
        adapters::Then {
            first: self,
            second: next,
        }
    }

    /// Embeds this stage in an outer input/output shape.
    ///
    /// `extract` picks this stage's input out of the borrowed outer value;
    /// `merge` receives the outer value back along with this stage's output.
    fn map<Extract, Merge, Outer, Merged>(
        self,
        extract: Extract,
        merge: Merge,
    ) -> impl Component<Input = Outer, Output = Merged, Error = Self::Error>
    where
        Self: Sized,
        Extract: Fn(&Outer) -> Self::Input,
        Merge: Fn(Outer, Self::Output) -> Merged,
    {
        adapters::Embedded {
            inner: self,
            extract,
            merge,
            shape: PhantomData,
        }
    }

    /// Converts this stage's error with `convert`.
    fn map_err<Convert, E>(
        self,
        convert: Convert,
    ) -> impl Component<Input = Self::Input, Output = Self::Output, Error = E>
    where
        Self: Sized,
        Convert: Fn(Self::Error) -> E,
        E: StdError + Send + Sync + 'static,
    {
        adapters::ErrInto {
            inner: self,
            convert,
            error: PhantomData,
        }
    }

    /// Calls `on_input` before the stage runs and `on_output` after it
    /// succeeds. Errors skip `on_output`.
    fn inspect<OnInput, OnOutput>(
        self,
        on_input: OnInput,
        on_output: OnOutput,
    ) -> impl Component<Input = Self::Input, Output = Self::Output, Error = Self::Error>
    where
        Self: Sized,
        OnInput: Fn(&Self::Input),
        OnOutput: Fn(&Self::Output),
    {
        adapters::Observed {
            inner: self,
            on_input,
            on_output,
        }
    }
}
