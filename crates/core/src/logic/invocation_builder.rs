use crate::prelude::*;

/// Pure construction of [`InvocationDescriptor`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvocationBuilder;

impl InvocationBuilder {
    /// Packages `arguments` for `operation`, checking them against its
    /// declared signature. Never performs I/O.
    pub fn build(
        operation: OperationHandle,
        arguments: impl IntoIterator<Item = ArgValue>,
    ) -> Result<InvocationDescriptor, InvocationBuildError> {
        let arguments = arguments.into_iter().collect::<Vec<_>>();
        let signature = operation.signature();
        if arguments.len() != signature.len() {
            return Err(InvocationBuildError::ArityMismatch {
                operation: operation.name(),
                expected: signature.len(),
                actual: arguments.len(),
            });
        }
        if let Some((position, (expected, actual))) = signature
            .iter()
            .zip(arguments.iter().map(ArgValue::kind))
            .enumerate()
            .find(|(_, (expected, actual))| *expected != actual)
        {
            return Err(InvocationBuildError::TypeMismatch {
                operation: operation.name(),
                position,
                expected: *expected,
                actual,
            });
        }
        Ok(InvocationDescriptor::new_unchecked(operation, arguments))
    }
}
