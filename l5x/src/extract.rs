//! Extraction of translator-facing shapes from the typed L5X tree.
//!
//! The document is deserialized once and walked once; the result carries
//! everything the translation needs (data types, tag initial values, rung
//! text lists) plus the warnings for whatever had to be skipped. Unsupported
//! tag shapes are recoverable: the tag is omitted with one warning.

use crate::error::{Error, Result};
use crate::model;

/// Everything extracted from one L5X document.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub data: ProjectData,
    /// One line per skipped or degraded construct
    pub warnings: Vec<String>,
}

/// Translator-facing view of a project.
#[derive(Debug, Clone)]
pub struct ProjectData {
    pub controller: String,
    /// User-defined types in document order
    pub data_types: Vec<UserType>,
    pub controller_tags: Vec<TagDecl>,
    pub programs: Vec<ProgramData>,
}

/// A user-defined data type.
#[derive(Debug, Clone)]
pub struct UserType {
    pub name: String,
    pub members: Vec<TypeMember>,
    /// Names of data types this type depends on
    pub dependencies: Vec<String>,
}

/// A member of a user-defined type. BIT members carrying a `Target` are
/// folded into their host member's `bit_fields`.
#[derive(Debug, Clone)]
pub struct TypeMember {
    pub name: String,
    pub data_type: String,
    /// 0 for scalars
    pub dimension: u32,
    /// Bit overlays hosted by this member; non-empty means the member is
    /// emitted as a word/bits union
    pub bit_fields: Vec<BitField>,
}

#[derive(Debug, Clone)]
pub struct BitField {
    pub name: String,
    pub bit: u32,
}

/// A tag with its initial value.
#[derive(Debug, Clone)]
pub struct TagDecl {
    pub name: String,
    pub data_type: String,
    pub value: TagValue,
}

/// Recursive initial-value tree of a decorated tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Scalar literal, verbatim
    Value(String),
    Array {
        dimensions: u32,
        /// (index, value) pairs as present in the document
        elements: Vec<(u32, TagValue)>,
    },
    Struct {
        members: Vec<(String, TagValue)>,
    },
}

#[derive(Debug, Clone)]
pub struct ProgramData {
    pub name: String,
    pub main_routine: Option<String>,
    pub tags: Vec<TagDecl>,
    pub routines: Vec<RoutineData>,
}

#[derive(Debug, Clone)]
pub struct RoutineData {
    pub name: String,
    pub rungs: Vec<RungData>,
}

#[derive(Debug, Clone)]
pub struct RungData {
    pub number: u32,
    pub logic: String,
    pub comment: Option<String>,
}

/// Extract the translator-facing shapes from a parsed project.
pub fn extract(project: &model::Project) -> Result<Extraction> {
    let controller = project
        .controller
        .as_ref()
        .ok_or(Error::MissingController)?;
    let mut warnings = Vec::new();

    let data_types = controller
        .data_types
        .as_ref()
        .map(|dt| extract_data_types(dt, &mut warnings))
        .unwrap_or_default();

    let controller_tags = controller
        .tags
        .as_ref()
        .map(|tags| extract_tags(tags, &mut warnings))
        .unwrap_or_default();

    let mut programs = Vec::new();
    if let Some(progs) = &controller.programs {
        for program in &progs.programs {
            programs.push(extract_program(program, &mut warnings));
        }
    }

    Ok(Extraction {
        data: ProjectData {
            controller: controller.name.clone(),
            data_types,
            controller_tags,
            programs,
        },
        warnings,
    })
}

fn extract_data_types(data_types: &model::DataTypes, warnings: &mut Vec<String>) -> Vec<UserType> {
    let mut result = Vec::new();
    for dt in &data_types.types {
        let mut members: Vec<TypeMember> = Vec::new();
        if let Some(ms) = &dt.members {
            for member in &ms.members {
                // BIT members overlay a host member named by Target.
                if member.data_type == "BIT" {
                    if let Some(target) = &member.target {
                        let bit = member
                            .bit_number
                            .as_deref()
                            .and_then(|b| b.trim().parse().ok())
                            .unwrap_or(0);
                        match members.iter_mut().find(|m| &m.name == target) {
                            Some(host) => {
                                host.bit_fields.push(BitField {
                                    name: member.name.clone(),
                                    bit,
                                });
                                continue;
                            }
                            None => {
                                warnings.push(format!(
                                    "Data type {}: bit member {} targets unknown member {}. Member was ignored.",
                                    dt.name, member.name, target
                                ));
                                continue;
                            }
                        }
                    }
                }
                let dimension = match parse_dimension(member.dimension.as_deref()) {
                    Some(d) => d,
                    None => {
                        warnings.push(format!(
                            "Data type {}: unsupported dimension '{}' on member {}. Member was ignored.",
                            dt.name,
                            member.dimension.as_deref().unwrap_or(""),
                            member.name
                        ));
                        continue;
                    }
                };
                members.push(TypeMember {
                    name: member.name.clone(),
                    data_type: member.data_type.clone(),
                    dimension,
                    bit_fields: Vec::new(),
                });
            }
        }
        for host in members.iter_mut() {
            host.bit_fields.sort_by_key(|b| b.bit);
        }
        let dependencies = dt
            .dependencies
            .as_ref()
            .map(|deps| deps.dependencies.iter().map(|d| d.name.clone()).collect())
            .unwrap_or_default();
        result.push(UserType {
            name: dt.name.clone(),
            members,
            dependencies,
        });
    }
    result
}

/// A single dimension; `None` marks the unsupported multi-dimensional form
/// (`Dimensions="2 3"`) or garbage.
fn parse_dimension(dimension: Option<&str>) -> Option<u32> {
    match dimension {
        None => Some(0),
        Some(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0)
            } else {
                s.parse().ok()
            }
        }
    }
}

fn extract_tags(tags: &model::Tags, warnings: &mut Vec<String>) -> Vec<TagDecl> {
    let mut result = Vec::new();
    for tag in &tags.tags {
        let Some(data_type) = tag.data_type.clone() else {
            warnings.push(format!(
                "Tag {} has no data type (alias tag?). Tag was ignored.",
                tag.name
            ));
            continue;
        };
        let Some(decorated) = tag
            .data
            .iter()
            .find(|d| d.format.as_deref() == Some("Decorated"))
        else {
            warnings.push(format!(
                "Tag {} has no Decorated Data. Tag was ignored.",
                tag.name
            ));
            continue;
        };
        match extract_data(decorated, &tag.name, warnings) {
            Some(value) => result.push(TagDecl {
                name: tag.name.clone(),
                data_type,
                value,
            }),
            None => warnings.push(format!(
                "Unsupported tag type {}. Tag {} was ignored.",
                data_type, tag.name
            )),
        }
    }
    result
}

fn extract_data(
    data: &model::Data,
    tag_name: &str,
    warnings: &mut Vec<String>,
) -> Option<TagValue> {
    if let Some(value) = &data.value {
        return Some(TagValue::Value(value.value.clone()));
    }
    if let Some(array) = &data.array {
        return extract_array(&array.dimensions, &array.elements, tag_name, warnings);
    }
    if let Some(structure) = &data.structure {
        return Some(extract_structure(structure, tag_name, warnings));
    }
    None
}

fn extract_array(
    dimensions: &str,
    elements: &[model::ArrayElement],
    tag_name: &str,
    warnings: &mut Vec<String>,
) -> Option<TagValue> {
    // Multi-dimensional arrays use a space-separated Dimensions attribute;
    // only single dimensions are translated.
    let dimensions: u32 = dimensions.trim().parse().ok()?;
    let mut out = Vec::new();
    for element in elements {
        let index = element.index.trim_matches(|c| c == '[' || c == ']');
        let Ok(index) = index.parse::<u32>() else {
            warnings.push(format!(
                "Tag {}: unsupported array index '{}'. Element was ignored.",
                tag_name, element.index
            ));
            continue;
        };
        if let Some(value) = &element.value {
            out.push((index, TagValue::Value(value.clone())));
        } else if let Some(structure) = &element.structure {
            out.push((index, extract_structure(structure, tag_name, warnings)));
        }
    }
    Some(TagValue::Array {
        dimensions,
        elements: out,
    })
}

fn extract_structure(
    structure: &model::DataStructure,
    tag_name: &str,
    warnings: &mut Vec<String>,
) -> TagValue {
    let mut members: Vec<(String, TagValue)> = Vec::new();
    for member in &structure.value_members {
        members.push((member.name.clone(), TagValue::Value(member.value.clone())));
    }
    for member in &structure.array_members {
        if let Some(value) = extract_array(&member.dimensions, &member.elements, tag_name, warnings)
        {
            members.push((member.name.clone(), value));
        } else {
            warnings.push(format!(
                "Tag {}: unsupported array member {}. Member was ignored.",
                tag_name, member.name
            ));
        }
    }
    for member in &structure.structure_members {
        members.push((
            member.name.clone(),
            extract_structure_member(member, tag_name, warnings),
        ));
    }
    TagValue::Struct { members }
}

fn extract_structure_member(
    member: &model::StructureMember,
    tag_name: &str,
    warnings: &mut Vec<String>,
) -> TagValue {
    let mut members: Vec<(String, TagValue)> = Vec::new();
    for m in &member.value_members {
        members.push((m.name.clone(), TagValue::Value(m.value.clone())));
    }
    for m in &member.array_members {
        if let Some(value) = extract_array(&m.dimensions, &m.elements, tag_name, warnings) {
            members.push((m.name.clone(), value));
        } else {
            warnings.push(format!(
                "Tag {}: unsupported array member {}. Member was ignored.",
                tag_name, m.name
            ));
        }
    }
    for m in &member.structure_members {
        members.push((m.name.clone(), extract_structure_member(m, tag_name, warnings)));
    }
    TagValue::Struct { members }
}

fn extract_program(program: &model::Program, warnings: &mut Vec<String>) -> ProgramData {
    let tags = program
        .tags
        .as_ref()
        .map(|tags| extract_tags(tags, warnings))
        .unwrap_or_default();

    let mut routines = Vec::new();
    if let Some(rs) = &program.routines {
        for routine in &rs.routines {
            let Some(rll) = &routine.rll_content else {
                // ST/FBD routines and empty routines are not translated.
                continue;
            };
            let mut rungs = Vec::new();
            for rung in &rll.rungs {
                let Some(logic) = rung.text.as_ref().and_then(|t| t.value.as_ref()) else {
                    continue;
                };
                let logic = logic.trim().to_string();
                if logic.is_empty() {
                    continue;
                }
                rungs.push(RungData {
                    number: rung.number,
                    logic,
                    comment: rung
                        .comment
                        .as_ref()
                        .and_then(|c| c.value.as_ref())
                        .map(|c| c.trim().to_string()),
                });
            }
            routines.push(RoutineData {
                name: routine.name.clone(),
                rungs,
            });
        }
    }

    ProgramData {
        name: program.name.clone(),
        main_routine: program.main_routine.clone(),
        tags,
        routines,
    }
}
