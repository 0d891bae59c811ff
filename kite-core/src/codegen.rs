//! Lowering from AST nodes to IR.
//!
//! `lower` is called once per top-level node in source order and
//! accumulates everything into the shared [`Module`]. All names live
//! in the module's one flat namespace; there is no scoping.
//!
//! Function signatures go through a single per-name table. The first
//! declaration wins, whether it came from an `extern` or was inferred
//! at a call site, and every later call is checked against it instead
//! of silently re-declaring.

use crate::ast::Node;
use crate::error::CompileError;
use crate::ir::{FnSig, Module, Ty, Value};

pub fn lower(node: &Node, module: &mut Module) -> Result<Value, CompileError> {
    match node {
        Node::Number(value) => Ok(Value {
            ty: Ty::I32,
            operand: value.to_string(),
        }),
        Node::Str(text) => Ok(lower_string(text, module)),
        Node::Variable(name) => {
            if module.has_global(name) {
                Ok(Value {
                    ty: Ty::Ptr,
                    operand: format!("@{name}"),
                })
            } else {
                Err(CompileError::UndefinedSymbol(name.clone()))
            }
        }
        Node::Extern(name) => {
            module.declare(name, extern_signature(name));
            Ok(Value::void())
        }
        Node::Call { callee, args } => lower_call(callee, args, module),
    }
}

/// Signature installed by an `extern` declaration.
///
/// `printf` is the one special case: a C-style variadic formatted
/// printer taking a byte pointer and returning i32. Every other name
/// declares as a zero-argument void function.
fn extern_signature(name: &str) -> FnSig {
    if name == "printf" {
        FnSig {
            params: vec![Ty::Ptr],
            ret: Ty::I32,
            variadic: true,
        }
    } else {
        FnSig {
            params: vec![],
            ret: Ty::Void,
            variadic: false,
        }
    }
}

/// Materialize a string literal and take the address of its first
/// byte, yielding the byte-pointer value every consumer expects.
fn lower_string(text: &str, module: &mut Module) -> Value {
    let (global, len) = module.add_string(text.as_bytes());
    let reg = module.fresh_reg();
    module.push(format!(
        "{reg} = getelementptr inbounds [{len} x i8], ptr {global}, i64 0, i64 0"
    ));
    Value {
        ty: Ty::Ptr,
        operand: reg,
    }
}

/// Parameter type inferred from the argument's AST variant alone.
fn infer_param_ty(arg: &Node) -> Result<Ty, CompileError> {
    match arg {
        Node::Str(_) | Node::Variable(_) => Ok(Ty::Ptr),
        Node::Number(_) => Ok(Ty::I32),
        Node::Call { callee, .. } => Err(CompileError::UnsupportedArgument(format!(
            "nested call to '{callee}'"
        ))),
        Node::Extern(name) => Err(CompileError::UnsupportedArgument(format!(
            "extern declaration of '{name}'"
        ))),
    }
}

fn lower_call(callee: &str, args: &[Node], module: &mut Module) -> Result<Value, CompileError> {
    let inferred: Vec<Ty> = args.iter().map(infer_param_ty).collect::<Result<_, _>>()?;

    let sig = match module.signature(callee) {
        Some(sig) => {
            check_compatible(callee, sig, &inferred)?;
            sig.clone()
        }
        None => {
            // The call site becomes the first (and binding) declaration.
            let sig = FnSig {
                params: inferred,
                ret: Ty::I32,
                variadic: true,
            };
            module.declare(callee, sig.clone());
            sig
        }
    };

    let mut rendered = Vec::with_capacity(args.len());
    for arg in args {
        rendered.push(lower(arg, module)?.typed());
    }
    let arg_text = rendered.join(", ");

    // Variadic callees need the full function type spelled out at the
    // call site.
    let callee_ty = if sig.variadic {
        sig.type_expr()
    } else {
        sig.ret.to_string()
    };

    if sig.ret == Ty::Void {
        module.push(format!("call {callee_ty} @{callee}({arg_text})"));
        Ok(Value::void())
    } else {
        let reg = module.fresh_reg();
        module.push(format!("{reg} = call {callee_ty} @{callee}({arg_text})"));
        Ok(Value {
            ty: sig.ret,
            operand: reg,
        })
    }
}

fn check_compatible(name: &str, sig: &FnSig, inferred: &[Ty]) -> Result<(), CompileError> {
    if inferred.len() < sig.params.len() {
        return Err(CompileError::SignatureMismatch {
            name: name.to_string(),
            reason: format!(
                "expected at least {} argument(s), got {}",
                sig.params.len(),
                inferred.len()
            ),
        });
    }
    if inferred.len() > sig.params.len() && !sig.variadic {
        return Err(CompileError::SignatureMismatch {
            name: name.to_string(),
            reason: format!(
                "expected exactly {} argument(s), got {}",
                sig.params.len(),
                inferred.len()
            ),
        });
    }
    for (index, (expected, got)) in sig.params.iter().zip(inferred).enumerate() {
        if expected != got {
            return Err(CompileError::SignatureMismatch {
                name: name.to_string(),
                reason: format!(
                    "argument {} has type {got}, expected {expected}",
                    index + 1
                ),
            });
        }
    }
    Ok(())
}
