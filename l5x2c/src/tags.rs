//! Tag declaration emission with C99 designated initializers.

use l5x::{TagDecl, TagValue};

use crate::ctypes::c_type_name;

/// Emit one tag declaration with its initializer.
pub fn emit_tag(out: &mut String, tag: &TagDecl) {
    let c_type = c_type_name(&tag.data_type);
    match &tag.value {
        TagValue::Array { dimensions, .. } => {
            out.push_str(&format!(
                "{} {}[{}] = {};\n",
                c_type,
                tag.name,
                dimensions,
                render_value(&tag.value)
            ));
        }
        _ => {
            out.push_str(&format!(
                "{} {} = {};\n",
                c_type,
                tag.name,
                render_value(&tag.value)
            ));
        }
    }
}

/// Render an initial-value tree as a C99 initializer expression.
///
/// Values are emitted verbatim; array elements are laid out in ascending
/// index order with absent elements defaulting to `0`; struct members use
/// designated initializers.
pub fn render_value(value: &TagValue) -> String {
    match value {
        TagValue::Value(literal) => literal.clone(),
        TagValue::Array {
            dimensions,
            elements,
        } => {
            let mut items = Vec::with_capacity(*dimensions as usize);
            for index in 0..*dimensions {
                match elements.iter().find(|(i, _)| *i == index) {
                    Some((_, v)) => items.push(render_value(v)),
                    None => items.push("0".to_string()),
                }
            }
            format!("{{ {} }}", items.join(", "))
        }
        TagValue::Struct { members } => {
            if members.is_empty() {
                return "{ 0 }".to_string();
            }
            let fields: Vec<String> = members
                .iter()
                .map(|(name, v)| format!(".{} = {}", name, render_value(v)))
                .collect();
            format!("{{ {} }}", fields.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, data_type: &str, value: TagValue) -> TagDecl {
        TagDecl {
            name: name.to_string(),
            data_type: data_type.to_string(),
            value,
        }
    }

    #[test]
    fn test_scalar_tag() {
        let mut out = String::new();
        emit_tag(&mut out, &decl("Limit", "DINT", TagValue::Value("42".into())));
        assert_eq!(out, "int32_t Limit = 42;\n");
    }

    #[test]
    fn test_bool_tag() {
        let mut out = String::new();
        emit_tag(&mut out, &decl("Run", "BOOL", TagValue::Value("0".into())));
        assert_eq!(out, "bool Run = 0;\n");
    }

    #[test]
    fn test_array_tag_with_gaps() {
        let mut out = String::new();
        emit_tag(
            &mut out,
            &decl(
                "Setpoints",
                "REAL",
                TagValue::Array {
                    dimensions: 4,
                    elements: vec![
                        (0, TagValue::Value("1.5".into())),
                        (2, TagValue::Value("2.5".into())),
                    ],
                },
            ),
        );
        assert_eq!(out, "float Setpoints[4] = { 1.5, 0, 2.5, 0 };\n");
    }

    #[test]
    fn test_struct_tag() {
        let mut out = String::new();
        emit_tag(
            &mut out,
            &decl(
                "Cycle",
                "TIMER",
                TagValue::Struct {
                    members: vec![
                        ("PRE".into(), TagValue::Value("250".into())),
                        ("ACC".into(), TagValue::Value("0".into())),
                        ("EN".into(), TagValue::Value("0".into())),
                    ],
                },
            ),
        );
        assert_eq!(out, "timer Cycle = { .PRE = 250, .ACC = 0, .EN = 0 };\n");
    }

    #[test]
    fn test_nested_initializers() {
        let value = TagValue::Struct {
            members: vec![
                (
                    "Samples".into(),
                    TagValue::Array {
                        dimensions: 2,
                        elements: vec![
                            (0, TagValue::Value("1".into())),
                            (1, TagValue::Value("2".into())),
                        ],
                    },
                ),
                (
                    "Inner".into(),
                    TagValue::Struct {
                        members: vec![("X".into(), TagValue::Value("3".into()))],
                    },
                ),
            ],
        };
        assert_eq!(
            render_value(&value),
            "{ .Samples = { 1, 2 }, .Inner = { .X = 3 } }"
        );
    }

    #[test]
    fn test_user_type_tag() {
        let mut out = String::new();
        emit_tag(
            &mut out,
            &decl("Recipe", "RecipeData", TagValue::Struct { members: vec![] }),
        );
        assert_eq!(out, "RecipeData_t Recipe = { 0 };\n");
    }
}
