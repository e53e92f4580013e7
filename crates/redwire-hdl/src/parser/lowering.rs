//! Lowering of a parsed program onto a [`CircuitBuilder`].

use std::sync::Arc;

use redwire_ir::{AnnotatedCircuit, CircuitBuilder, InstanceId};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ast::{Arg, Binding, Expr, Program};
use crate::error::{HdlError, HdlResult};
use crate::options::HdlOptions;
use crate::registry::Registry;

/// Lower a program into a builder ready to be flattened.
pub(crate) fn lower(
    program: &Program,
    registry: &Registry,
    options: &HdlOptions,
) -> HdlResult<CircuitBuilder> {
    let mut lowerer = Lowerer::new(registry, options.strict);
    lowerer.lower(program)?;
    Ok(lowerer.builder)
}

/// What a name is bound to.
#[derive(Debug, Clone, Copy)]
enum Value {
    /// An input port, by declaration index.
    Input(usize),
    Instance(InstanceId),
}

/// An input port whose instance is created on first use.
#[derive(Debug)]
struct PendingInput {
    name: String,
    width: Option<usize>,
    instance: Option<InstanceId>,
}

/// Compilation context threaded through the recursive expression walk.
struct Lowerer<'r> {
    registry: &'r Registry,
    strict: bool,
    builder: CircuitBuilder,
    bindings: FxHashMap<String, Value>,
    /// Next alias suffix to try, per name.
    aliases: FxHashMap<String, usize>,
    inputs: Vec<PendingInput>,
}

impl<'r> Lowerer<'r> {
    fn new(registry: &'r Registry, strict: bool) -> Self {
        Self {
            registry,
            strict,
            builder: CircuitBuilder::new().strict(strict),
            bindings: FxHashMap::default(),
            aliases: FxHashMap::default(),
            inputs: Vec::new(),
        }
    }

    fn lower(&mut self, program: &Program) -> HdlResult<()> {
        for port in &program.inputs {
            let index = self.inputs.len();
            self.rebind(&port.name)?;
            self.inputs.push(PendingInput {
                name: port.name.clone(),
                width: port.width,
                instance: None,
            });
            self.bindings.insert(port.name.clone(), Value::Input(index));
        }

        for binding in &program.bindings {
            self.lower_binding(binding)?;
        }

        let line = program.output_line;
        let output = match program.outputs.as_slice() {
            [port] => port,
            ports => {
                return Err(HdlError::OutputCount {
                    line,
                    found: ports.len(),
                });
            }
        };
        let id = self.resolve(&output.name, output.width, line)?;
        if self.strict {
            if let Some(declared) = output.width {
                let bound = self.width_of(id);
                if declared != bound {
                    return Err(HdlError::StrictCheck {
                        line,
                        message: format!(
                            "output '{}' is declared {declared} bits wide but bound to {bound} bits",
                            output.name
                        ),
                    });
                }
            }
        }
        self.builder.mark_output(id)?;

        // Inputs are designated last so unused ones still get a slot, in
        // declaration order.
        for index in 0..self.inputs.len() {
            let id = self.materialize_input(index, 1)?;
            self.builder.mark_input(id)?;
        }
        Ok(())
    }

    fn lower_binding(&mut self, binding: &Binding) -> HdlResult<()> {
        let (circuit, producers) = self.lower_call(&binding.expr, binding.line)?;
        self.rebind(&binding.name)?;
        let id = self
            .builder
            .add_named_instance(circuit, binding.name.clone())?;
        for producer in producers {
            self.builder.plug(id, producer)?;
        }
        self.bindings
            .insert(binding.name.clone(), Value::Instance(id));
        Ok(())
    }

    /// Lower the arguments of a call, returning the callee and its producers.
    fn lower_call(
        &mut self,
        expr: &Expr,
        line: usize,
    ) -> HdlResult<(Arc<AnnotatedCircuit>, Vec<InstanceId>)> {
        let circuit =
            self.registry
                .get(&expr.circuit)
                .ok_or_else(|| HdlError::MissingDependency {
                    name: expr.circuit.clone(),
                    line,
                })?;
        debug!(circuit = %expr.circuit, line, "resolved dependency");

        let groups = circuit.input_groups();
        if self.strict && expr.args.len() != groups.len() {
            return Err(HdlError::StrictCheck {
                line,
                message: format!(
                    "'{}' takes {} arguments, got {}",
                    expr.circuit,
                    groups.len(),
                    expr.args.len()
                ),
            });
        }

        let mut producers = Vec::with_capacity(expr.args.len());
        for (i, arg) in expr.args.iter().enumerate() {
            let expected = groups.get(i).map(|group| group.width);
            let id = match arg {
                Arg::Name(name) => self.resolve(name, expected, line)?,
                Arg::Nested(inner) => self.lower_nested(inner, line)?,
            };
            if self.strict {
                let got = self.width_of(id);
                if expected != Some(got) {
                    return Err(HdlError::StrictCheck {
                        line,
                        message: format!(
                            "argument {} of '{}' is {got} bits wide, expected {}",
                            i + 1,
                            expr.circuit,
                            expected.unwrap_or_default()
                        ),
                    });
                }
            }
            producers.push(id);
        }
        Ok((circuit, producers))
    }

    fn lower_nested(&mut self, expr: &Expr, line: usize) -> HdlResult<InstanceId> {
        let (circuit, producers) = self.lower_call(expr, line)?;
        let id = self.builder.add_instance(circuit);
        for producer in producers {
            self.builder.plug(id, producer)?;
        }
        Ok(id)
    }

    /// Look up a bound name. `width` sizes an input that is used for the
    /// first time and has no declared width.
    fn resolve(&mut self, name: &str, width: Option<usize>, line: usize) -> HdlResult<InstanceId> {
        match self.bindings.get(name).copied() {
            Some(Value::Instance(id)) => Ok(id),
            Some(Value::Input(index)) => self.materialize_input(index, width.unwrap_or(1)),
            None => Err(HdlError::UnboundName {
                name: name.to_string(),
                line,
            }),
        }
    }

    fn materialize_input(&mut self, index: usize, width: usize) -> HdlResult<InstanceId> {
        let input = &self.inputs[index];
        if let Some(id) = input.instance {
            return Ok(id);
        }
        let width = input.width.unwrap_or(width);
        let name = input.name.clone();
        let id = self
            .builder
            .add_named_instance(Arc::new(AnnotatedCircuit::identity(width)), name.clone())?;
        debug!(input = %name, width, "created input port");
        self.inputs[index].width = Some(width);
        self.inputs[index].instance = Some(id);
        Ok(id)
    }

    fn width_of(&self, id: InstanceId) -> usize {
        self.builder
            .instance_circuit(id)
            .map_or(0, |circuit| circuit.total_output_width())
    }

    /// Move an existing binding of `name` to its first free alias.
    fn rebind(&mut self, name: &str) -> HdlResult<()> {
        let Some(old) = self.bindings.remove(name) else {
            return Ok(());
        };

        let next = self.aliases.entry(name.to_string()).or_insert(0);
        let alias = loop {
            let candidate = format!("{name}_{next}");
            *next += 1;
            if !self.bindings.contains_key(&candidate) {
                break candidate;
            }
        };
        debug!(name, alias = %alias, "moved previous binding to alias");

        match old {
            Value::Instance(id) => self.builder.set_name(id, alias.clone())?,
            Value::Input(index) => {
                let input = &mut self.inputs[index];
                input.name.clone_from(&alias);
                if let Some(id) = input.instance {
                    self.builder.set_name(id, alias.clone())?;
                }
            }
        }
        self.bindings.insert(alias, old);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::stdlib::build_default_registry;

    fn lower_source(source: &str, strict: bool) -> HdlResult<CircuitBuilder> {
        let registry = build_default_registry().unwrap();
        let program = parse(source).unwrap();
        lower(&program, &registry, &HdlOptions { strict })
    }

    #[test]
    fn test_rebinding_moves_old_value_to_alias() {
        let builder = lower_source("a\na = not a\na = not a\na", true).unwrap();
        let input = builder.instance_by_name("a_0").unwrap();
        let first = builder.instance_by_name("a_1").unwrap();
        let second = builder.instance_by_name("a").unwrap();
        assert!(input < first && first < second);
    }

    #[test]
    fn test_alias_skips_taken_names() {
        let builder = lower_source("a a_0\na = not a_0\na", true).unwrap();
        // `a_0` is bound as an input, so the old `a` becomes `a_1`.
        assert!(builder.instance_by_name("a_1").is_some());
        assert!(builder.instance_by_name("a_0").is_some());
    }

    #[test]
    fn test_input_width_from_first_use() {
        let builder = lower_source("a b\ns = add2 a b\ns", true).unwrap();
        let a = builder.instance_by_name("a").unwrap();
        assert_eq!(builder.instance_circuit(a).unwrap().total_output_width(), 2);
    }

    #[test]
    fn test_unused_input_defaults_to_one_bit() {
        let builder = lower_source("a b\nc = not a\nc", true).unwrap();
        let b = builder.instance_by_name("b").unwrap();
        assert_eq!(builder.instance_circuit(b).unwrap().total_output_width(), 1);
    }

    #[test]
    fn test_strict_argument_count() {
        let err = lower_source("a b\nc = not a b\nc", true).unwrap_err();
        assert!(matches!(err, HdlError::StrictCheck { line: 2, .. }));
        assert!(lower_source("a b\nc = not a b\nc", false).is_ok());
    }

    #[test]
    fn test_strict_argument_width() {
        let err = lower_source("2:a\nc = not a\nc", true).unwrap_err();
        assert!(matches!(err, HdlError::StrictCheck { line: 2, .. }));
    }

    #[test]
    fn test_strict_output_width() {
        let err = lower_source("a\nc = not a\n2:c", true).unwrap_err();
        assert!(matches!(err, HdlError::StrictCheck { line: 3, .. }));
        assert!(lower_source("a\nc = not a\n2:c", false).is_ok());
    }

    #[test]
    fn test_output_count() {
        let err = lower_source("a\nb = not a\nc = not a\nb c", true).unwrap_err();
        assert!(matches!(err, HdlError::OutputCount { line: 4, found: 2 }));
    }

    #[test]
    fn test_missing_dependency() {
        let err = lower_source("a\nb = frobnicate a\nb", true).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.missing_dependency(), Some("frobnicate"));
    }

    #[test]
    fn test_unbound_name() {
        let err = lower_source("a\nb = not c\nb", true).unwrap_err();
        assert!(matches!(err, HdlError::UnboundName { ref name, line: 2 } if name == "c"));
    }
}
