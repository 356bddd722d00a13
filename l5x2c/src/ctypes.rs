//! C type mapping and data-type struct emission.
//!
//! User-defined types are emitted as `typedef struct` declarations in
//! dependency order (Kahn's algorithm over the declared dependency lists,
//! deterministic on document order). A dependency cycle is a dedicated fatal
//! error rather than an endless scan.

use std::collections::HashMap;
use std::collections::VecDeque;

use l5x::{TypeMember, UserType};

use crate::error::{Error, Result};

/// Map an L5X type name to its C spelling. Unknown names are user structs.
pub fn c_type_name(name: &str) -> String {
    match name {
        "SINT" => "int8_t".to_string(),
        "INT" => "int16_t".to_string(),
        "DINT" => "int32_t".to_string(),
        "LINT" => "int64_t".to_string(),
        "USINT" => "uint8_t".to_string(),
        "UINT" => "uint16_t".to_string(),
        "UDINT" => "uint32_t".to_string(),
        "ULINT" => "uint64_t".to_string(),
        "REAL" => "float".to_string(),
        "LREAL" => "double".to_string(),
        "BOOL" | "BIT" => "bool".to_string(),
        "TIMER" => "timer".to_string(),
        "COUNTER" => "counter".to_string(),
        other => format!("{}_t", other),
    }
}

/// Order types so every dependency is declared before its dependents.
///
/// Dependencies naming types outside the set (built-ins, module-defined
/// types) are treated as satisfied.
pub fn order_by_dependencies(types: &[UserType]) -> Result<Vec<&UserType>> {
    let index_of: HashMap<&str, usize> = types
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    let mut indegree = vec![0usize; types.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); types.len()];
    for (i, t) in types.iter().enumerate() {
        for dep in &t.dependencies {
            if let Some(&d) = index_of.get(dep.as_str()) {
                indegree[i] += 1;
                dependents[d].push(i);
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..types.len()).filter(|&i| indegree[i] == 0).collect();
    let mut ordered = Vec::with_capacity(types.len());
    while let Some(i) = queue.pop_front() {
        ordered.push(&types[i]);
        for &j in &dependents[i] {
            indegree[j] -= 1;
            if indegree[j] == 0 {
                queue.push_back(j);
            }
        }
    }

    if ordered.len() != types.len() {
        let names = types
            .iter()
            .enumerate()
            .filter(|&(i, _)| indegree[i] > 0)
            .map(|(_, t)| t.name.clone())
            .collect();
        return Err(Error::TypeCycle { names });
    }
    Ok(ordered)
}

/// Emit all user-defined types in dependency order.
pub fn emit_data_types(out: &mut String, types: &[UserType]) -> Result<()> {
    for t in order_by_dependencies(types)? {
        emit_struct(out, t);
    }
    Ok(())
}

fn emit_struct(out: &mut String, t: &UserType) {
    out.push_str("typedef struct {\n");
    for member in &t.members {
        emit_member(out, member);
    }
    out.push_str(&format!("}} {};\n\n", c_type_name(&t.name)));
}

fn emit_member(out: &mut String, member: &TypeMember) {
    // A member hosting bit overlays is accessible both as a word and as its
    // bits, hence the anonymous union.
    if !member.bit_fields.is_empty() {
        out.push_str("    union {\n");
        out.push_str(&format!(
            "        {} {};\n",
            c_type_name(&member.data_type),
            member.name
        ));
        out.push_str("        struct {\n");
        for field in &member.bit_fields {
            out.push_str(&format!("            bool {} : 1;\n", field.name));
        }
        out.push_str("        };\n");
        out.push_str("    };\n");
        return;
    }
    if member.data_type == "BIT" {
        out.push_str(&format!("    bool {} : 1;\n", member.name));
        return;
    }
    if member.dimension > 0 {
        out.push_str(&format!(
            "    {} {}[{}];\n",
            c_type_name(&member.data_type),
            member.name,
            member.dimension
        ));
        return;
    }
    out.push_str(&format!(
        "    {} {};\n",
        c_type_name(&member.data_type),
        member.name
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use l5x::BitField;

    fn user_type(name: &str, deps: &[&str]) -> UserType {
        UserType {
            name: name.to_string(),
            members: Vec::new(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_map() {
        assert_eq!(c_type_name("DINT"), "int32_t");
        assert_eq!(c_type_name("REAL"), "float");
        assert_eq!(c_type_name("BOOL"), "bool");
        assert_eq!(c_type_name("BIT"), "bool");
        assert_eq!(c_type_name("TIMER"), "timer");
        assert_eq!(c_type_name("MyUdt"), "MyUdt_t");
    }

    #[test]
    fn test_dependency_order() {
        // Outer depends on Inner: Inner must come first regardless of
        // document order
        let types = vec![user_type("Outer", &["Inner"]), user_type("Inner", &[])];
        let ordered = order_by_dependencies(&types).unwrap();
        let names: Vec<&str> = ordered.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Inner", "Outer"]);
    }

    #[test]
    fn test_order_is_stable_for_independent_types() {
        let types = vec![user_type("A", &[]), user_type("B", &[]), user_type("C", &[])];
        let ordered = order_by_dependencies(&types).unwrap();
        let names: Vec<&str> = ordered.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_dependency_is_satisfied() {
        let types = vec![user_type("A", &["TIMER", "Missing"])];
        assert!(order_by_dependencies(&types).is_ok());
    }

    #[test]
    fn test_cycle_is_detected() {
        let types = vec![user_type("A", &["B"]), user_type("B", &["A"])];
        match order_by_dependencies(&types) {
            Err(Error::TypeCycle { names }) => {
                assert!(names.contains(&"A".to_string()));
                assert!(names.contains(&"B".to_string()));
            }
            other => panic!("expected cycle error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_struct_emission() {
        let t = UserType {
            name: "Motor".to_string(),
            members: vec![
                TypeMember {
                    name: "Speed".to_string(),
                    data_type: "REAL".to_string(),
                    dimension: 0,
                    bit_fields: Vec::new(),
                },
                TypeMember {
                    name: "History".to_string(),
                    data_type: "DINT".to_string(),
                    dimension: 8,
                    bit_fields: Vec::new(),
                },
                TypeMember {
                    name: "Enable".to_string(),
                    data_type: "BIT".to_string(),
                    dimension: 0,
                    bit_fields: Vec::new(),
                },
            ],
            dependencies: Vec::new(),
        };
        let mut out = String::new();
        emit_struct(&mut out, &t);
        assert_eq!(
            out,
            "typedef struct {\n    float Speed;\n    int32_t History[8];\n    bool Enable : 1;\n} Motor_t;\n\n"
        );
    }

    #[test]
    fn test_bit_host_union_emission() {
        let t = UserType {
            name: "Flags".to_string(),
            members: vec![TypeMember {
                name: "ZZZZZZZZZZFlags0".to_string(),
                data_type: "SINT".to_string(),
                dimension: 0,
                bit_fields: vec![
                    BitField {
                        name: "Run".to_string(),
                        bit: 0,
                    },
                    BitField {
                        name: "Fault".to_string(),
                        bit: 1,
                    },
                ],
            }],
            dependencies: Vec::new(),
        };
        let mut out = String::new();
        emit_struct(&mut out, &t);
        assert_eq!(
            out,
            "typedef struct {\n    union {\n        int8_t ZZZZZZZZZZFlags0;\n        struct {\n            bool Run : 1;\n            bool Fault : 1;\n        };\n    };\n} Flags_t;\n\n"
        );
    }
}
