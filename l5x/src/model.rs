//! Serde model of the L5X subset consumed by the translator.
//!
//! Only the elements the translation needs are typed: the controller's data
//! types, decorated tag data, and the RLL routines of each program. Unknown
//! elements and attributes are skipped by the deserializer.

use serde::Deserialize;

/// Root of an L5X export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "RSLogix5000Content")]
pub struct Project {
    #[serde(rename = "Controller")]
    pub controller: Option<Controller>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Controller {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "DataTypes")]
    pub data_types: Option<DataTypes>,
    #[serde(rename = "Tags")]
    pub tags: Option<Tags>,
    #[serde(rename = "Programs")]
    pub programs: Option<Programs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataTypes {
    #[serde(rename = "DataType", default)]
    pub types: Vec<DataType>,
}

/// A user-defined data type declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataType {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "Members")]
    pub members: Option<Members>,
    #[serde(rename = "Dependencies")]
    pub dependencies: Option<Dependencies>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Members {
    #[serde(rename = "Member", default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@DataType")]
    pub data_type: String,
    #[serde(rename = "@Dimension")]
    pub dimension: Option<String>,
    #[serde(rename = "@Radix")]
    pub radix: Option<String>,
    #[serde(rename = "@Hidden")]
    pub hidden: Option<String>,
    /// Host member a BIT member overlays
    #[serde(rename = "@Target")]
    pub target: Option<String>,
    #[serde(rename = "@BitNumber")]
    pub bit_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dependencies {
    #[serde(rename = "Dependency", default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dependency {
    #[serde(rename = "@Type")]
    pub dependency_type: Option<String>,
    #[serde(rename = "@Name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tags {
    #[serde(rename = "Tag", default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "@TagType")]
    pub tag_type: Option<String>,
    #[serde(rename = "Data", default)]
    pub data: Vec<Data>,
}

/// A `<Data>` element; only the `Decorated` format is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    #[serde(rename = "@Format")]
    pub format: Option<String>,
    #[serde(rename = "DataValue")]
    pub value: Option<DataValue>,
    #[serde(rename = "Array")]
    pub array: Option<Box<DataArray>>,
    #[serde(rename = "Structure")]
    pub structure: Option<Box<DataStructure>>,
    /// Raw payload of non-decorated formats (L5K and friends); ignored
    #[serde(rename = "$text")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataValue {
    #[serde(rename = "@DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "@Radix")]
    pub radix: Option<String>,
    #[serde(rename = "@Value")]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataArray {
    #[serde(rename = "@DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "@Dimensions")]
    pub dimensions: String,
    #[serde(rename = "@Radix")]
    pub radix: Option<String>,
    #[serde(rename = "Element", default)]
    pub elements: Vec<ArrayElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrayElement {
    /// Index as written, e.g. `[3]`
    #[serde(rename = "@Index")]
    pub index: String,
    #[serde(rename = "@Value")]
    pub value: Option<String>,
    #[serde(rename = "Structure")]
    pub structure: Option<DataStructure>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataStructure {
    #[serde(rename = "@DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "DataValueMember", default)]
    pub value_members: Vec<DataValueMember>,
    #[serde(rename = "ArrayMember", default)]
    pub array_members: Vec<ArrayMember>,
    #[serde(rename = "StructureMember", default)]
    pub structure_members: Vec<StructureMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataValueMember {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "@Radix")]
    pub radix: Option<String>,
    #[serde(rename = "@Value")]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrayMember {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "@Dimensions")]
    pub dimensions: String,
    #[serde(rename = "@Radix")]
    pub radix: Option<String>,
    #[serde(rename = "Element", default)]
    pub elements: Vec<ArrayElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureMember {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@DataType")]
    pub data_type: Option<String>,
    #[serde(rename = "DataValueMember", default)]
    pub value_members: Vec<DataValueMember>,
    #[serde(rename = "ArrayMember", default)]
    pub array_members: Vec<ArrayMember>,
    #[serde(rename = "StructureMember", default)]
    pub structure_members: Vec<StructureMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Programs {
    #[serde(rename = "Program", default)]
    pub programs: Vec<Program>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Program {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@MainRoutineName")]
    pub main_routine: Option<String>,
    #[serde(rename = "Tags")]
    pub tags: Option<Tags>,
    #[serde(rename = "Routines")]
    pub routines: Option<Routines>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Routines {
    #[serde(rename = "Routine", default)]
    pub routines: Vec<Routine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Routine {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@Type")]
    pub routine_type: Option<String>,
    #[serde(rename = "RLLContent")]
    pub rll_content: Option<RllContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RllContent {
    #[serde(rename = "Rung", default)]
    pub rungs: Vec<Rung>,
}

/// One ladder rung: number, logic text and optional comment, both CDATA.
#[derive(Debug, Clone, Deserialize)]
pub struct Rung {
    #[serde(rename = "@Number")]
    pub number: u32,
    #[serde(rename = "@Type")]
    pub rung_type: Option<String>,
    #[serde(rename = "Comment")]
    pub comment: Option<TextContent>,
    #[serde(rename = "Text")]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    #[serde(rename = "$text")]
    pub value: Option<String>,
}
