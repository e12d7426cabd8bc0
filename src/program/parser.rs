// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text form of IR programs.
//!
//! One instruction per line, in the same shape [`Instruction::render`]
//! produces:
//!
//! ```text
//! # Bell pair
//! H qreg0
//! CNOT qreg0 qreg1
//! Rz(0.25) qreg1
//! ```
//!
//! Blank lines and lines starting with `#` or `//` are ignored. Operands must
//! name the program's register followed by a qubit index.
//!
//! [`Instruction::render`]: crate::instruction::Instruction::render

use super::Program;
use crate::error::{Error, Result};
use crate::instruction::InstructionRegistry;
use crate::validation::validate_register_name;

/// Parse program text over `register`, creating instructions through
/// `registry`.
pub fn parse_program(register: &str, source: &str, registry: &InstructionRegistry) -> Result<Program> {
    validate_register_name(register)?;

    let mut program = Program::new(register);
    for (i, raw) in source.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let (name, params, operands) = split_line(line).map_err(|message| Error::Parse {
            line: line_no,
            message,
        })?;

        let bits = operands
            .iter()
            .map(|op| parse_operand(register, op))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|message| Error::Parse {
                line: line_no,
                message,
            })?;

        let instruction = registry
            .create_with_params(name, &bits, &params)
            .map_err(|e| Error::Parse {
                line: line_no,
                message: e.to_string(),
            })?;
        program.push_boxed(instruction);
    }

    Ok(program)
}

/// Split `Name(p1, p2) op op` into name, parameters, operand tokens.
fn split_line(line: &str) -> std::result::Result<(&str, Vec<f64>, Vec<&str>), String> {
    let (head, rest) = match line.find('(') {
        Some(open) if !line[..open].contains(char::is_whitespace) => {
            let close = line[open..]
                .find(')')
                .map(|c| open + c)
                .ok_or_else(|| "unclosed parameter list".to_string())?;
            let list = line[open + 1..close].trim();
            let params = if list.is_empty() {
                Vec::new()
            } else {
                list.split(',')
                    .map(str::trim)
                    .map(|p| match p {
                        "" => Err("empty parameter".to_string()),
                        p => p
                            .parse::<f64>()
                            .map_err(|_| format!("invalid parameter '{}'", p)),
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };
            ((&line[..open], params), &line[close + 1..])
        }
        _ => match line.split_once(char::is_whitespace) {
            Some((name, rest)) => ((name, Vec::new()), rest),
            None => ((line, Vec::new()), ""),
        },
    };

    let (name, params) = head;
    if name.is_empty() {
        return Err("missing instruction name".to_string());
    }
    Ok((name, params, rest.split_whitespace().collect()))
}

fn parse_operand(register: &str, operand: &str) -> std::result::Result<usize, String> {
    let index = operand
        .strip_prefix(register)
        .ok_or_else(|| format!("operand '{}' does not address register '{}'", operand, register))?;
    // Digits only: `parse` would also take a leading '+'
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid qubit index in operand '{}'", operand));
    }
    index
        .parse::<usize>()
        .map_err(|_| format!("qubit index out of range in operand '{}'", operand))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> InstructionRegistry {
        InstructionRegistry::with_builtins()
    }

    #[test]
    fn test_parse_simple_program() {
        let source = "# bell\nH qreg0\n\nCNOT qreg0 qreg1\n// done\n";
        let program = parse_program("qreg", source, &registry()).unwrap();
        assert_eq!(program.render(), vec!["H qreg0", "CNOT qreg0 qreg1"]);
    }

    #[test]
    fn test_parse_params() {
        let program = parse_program("q", "Rz(0.25) q1\nCoupler(-1.5) q0 q3", &registry()).unwrap();
        assert_eq!(program.instructions()[0].params(), &[0.25]);
        assert_eq!(program.instructions()[1].bits(), &[0, 3]);
        assert_eq!(program.instructions()[1].params(), &[-1.5]);
    }

    #[test]
    fn test_rendered_program_parses_back() {
        let source = "H q0\nRx(1.5707963267948966) q1\nSwap q1 q0\nMeasure q0";
        let program = parse_program("q", source, &registry()).unwrap();
        assert_eq!(program.to_string(), source);
    }

    #[test]
    fn test_parse_register_with_trailing_digit() {
        let program = parse_program("q1", "Y q112", &registry()).unwrap();
        assert_eq!(program.instructions()[0].bits(), &[12]);
    }

    #[test]
    fn test_parse_unknown_instruction() {
        let err = parse_program("q", "Y q0\nToffoli q0 q1 q2", &registry()).unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("Toffoli"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_wrong_register() {
        let err = parse_program("q", "Y r0", &registry()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_bad_index() {
        let err = parse_program("q", "Y qx", &registry()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_signed_index_rejected() {
        let err = parse_program("q", "Y q0\nY q+3", &registry()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
        assert!(parse_program("q", "Y q-1", &registry()).is_err());
        assert!(parse_program("q", "Y q", &registry()).is_err());
    }

    #[test]
    fn test_parse_empty_parameter_rejected() {
        for source in ["Rz(,) q0", "Rz(0.5,) q0", "Rz( , 0.5) q0"] {
            match parse_program("q", source, &registry()) {
                Err(Error::Parse { line, message }) => {
                    assert_eq!(line, 1);
                    assert!(message.contains("empty parameter"), "{source}: {message}");
                }
                other => panic!("{source}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_empty_parameter_list_uses_defaults() {
        let program = parse_program("q", "Rz() q0", &registry()).unwrap();
        assert_eq!(program.instructions()[0].params(), &[0.0]);
    }

    #[test]
    fn test_parse_arity_error_reports_line() {
        let err = parse_program("q", "H q0\nH q1\nCNOT q0", &registry()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_unclosed_params() {
        let err = parse_program("q", "Rz(0.5 q0", &registry()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_invalid_register_name() {
        assert!(matches!(
            parse_program("", "Y q0", &registry()),
            Err(Error::Validation(_))
        ));
    }
}
