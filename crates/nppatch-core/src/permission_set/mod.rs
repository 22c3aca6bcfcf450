//! Admin permission set covering every packaged object and custom field.
//!
//! Built from the object metadata directory
//! (`<objects>/<Object>/fields/*.field-meta.xml`).
//! Custom names carry the `%%%NAMESPACE%%%` token so the packaging step can
//! substitute the real namespace.


use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;
use tracing::{info, warn};

use crate::error::NppatchError;

/// Placeholder replaced with the package namespace at build time.
pub const NAMESPACE_TOKEN: &str = "%%%NAMESPACE%%%";

const METADATA_NS: &str = "http://soap.sforce.com/2006/04/metadata";
const FIELD_META_SUFFIX: &str = ".field-meta.xml";

const DESCRIPTION: &str = "Full access to all nppatch package objects and fields. \
                           Required for admin users and package tests.";
const LABEL: &str = "nppatch Admin";
const LICENSE: &str = "Salesforce";

/// Custom settings are read through Apex and get no object permissions.
pub const CUSTOM_SETTINGS: &[&str] = &[
    "Addr_Verification_Settings__c",
    "Address_Verification_Settings__c",
    "Affiliations_Settings__c",
    "Allocations_Settings__c",
    "Batch_Data_Entry_Settings__c",
    "Contacts_And_Orgs_Settings__c",
    "Custom_Column_Header__c",
    "Custom_Field_Mapping__c",
    "Custom_Installment_Settings__c",
    "Customizable_Rollup_Settings__c",
    "Data_Import_Settings__c",
    "Error_Settings__c",
    "Gift_Entry_Settings__c",
    "Household_Naming_Settings__c",
    "Households_Settings__c",
    "Levels_Settings__c",
    "Opportunity_Naming_Settings__c",
    "Package_Settings__c",
    "Payment_Field_Mapping_Settings__c",
    "Payment_Services_Configuration__c",
    "Recurring_Donations_Settings__c",
    "Relationship_Auto_Create__c",
    "Relationship_Lookup__c",
    "Relationship_Settings__c",
    "Relationship_Sync_Excluded_Fields__c",
    "User_Rollup_Field_Settings__c",
];

/// Custom metadata types get no object permissions either.
pub const CUSTOM_METADATA_TYPES: &[&str] = &[
    "Custom_Notification__mdt",
    "Data_Import_Field_Mapping_Set__mdt",
    "Data_Import_Field_Mapping__mdt",
    "Data_Import_Object_Mapping_Set__mdt",
    "Data_Import_Object_Mapping__mdt",
    "Filter_Group__mdt",
    "Filter_Rule__mdt",
    "GetStartedChecklistItem__mdt",
    "GetStartedChecklistSection__mdt",
    "Opportunity_Stage_To_State_Mapping__mdt",
    "RecurringDonationStatusMapping__mdt",
    "Rollup__mdt",
];

/// What a field's metadata allows the permission set to grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// Master-detail and required fields reject any permission entry.
    Skip,
    /// Formula fields: readable, never editable.
    ReadOnly,
    ReadWrite,
}

/// The parts of a `.field-meta.xml` that decide access.
#[derive(Debug, Default, PartialEq, Eq)]
struct FieldMeta {
    field_type: Option<String>,
    required: Option<String>,
    formula: Option<String>,
}

impl FieldMeta {
    fn access(&self) -> FieldAccess {
        if self.field_type.as_deref() == Some("MasterDetail") {
            return FieldAccess::Skip;
        }
        if self.required.as_deref() == Some("true") {
            return FieldAccess::Skip;
        }
        if self.formula.as_deref().is_some_and(|f| !f.is_empty()) {
            return FieldAccess::ReadOnly;
        }
        FieldAccess::ReadWrite
    }
}

/// Pull the first `type`, `required`, and `formula` values out of field metadata.
fn parse_field_meta(content: &str) -> Result<FieldMeta, NppatchError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut meta = FieldMeta::default();
    let mut open: Option<Vec<u8>> = None;

    loop {
        let text = match reader.read_event()? {
            Event::Start(e) => {
                open = Some(e.local_name().as_ref().to_vec());
                continue;
            }
            Event::End(_) => {
                open = None;
                continue;
            }
            Event::Text(t) => t.unescape()?.into_owned(),
            Event::CData(c) => String::from_utf8_lossy(&c).into_owned(),
            Event::Eof => break,
            _ => continue,
        };
        let slot = match open.as_deref() {
            Some(b"type") => &mut meta.field_type,
            Some(b"required") => &mut meta.required,
            Some(b"formula") => &mut meta.formula,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    Ok(meta)
}

/// Access for the field described by `path`.
///
/// Missing or unreadable metadata grants full access.
pub fn field_access(path: &Path) -> FieldAccess {
    let Ok(content) = std::fs::read_to_string(path) else {
        return FieldAccess::ReadWrite;
    };
    match parse_field_meta(&content) {
        Ok(meta) => meta.access(),
        Err(e) => {
            warn!(
                "permission set: unreadable field metadata {}: {e}",
                path.display()
            );
            FieldAccess::ReadWrite
        }
    }
}

/// Prefix custom (`__c`) names with the namespace token.
pub fn with_namespace(name: &str) -> String {
    if name.ends_with("__c") {
        format!("{NAMESPACE_TOKEN}{name}")
    } else {
        name.to_string()
    }
}

/// Whether `object` gets a CRUD entry: custom objects that are neither
/// custom settings nor custom metadata types.
pub fn grants_object_access(object: &str) -> bool {
    object.ends_with("__c")
        && !CUSTOM_SETTINGS.contains(&object)
        && !CUSTOM_METADATA_TYPES.contains(&object)
}

/// Sorted object directory names under `objects_dir`.
pub fn list_objects(objects_dir: &Path) -> Result<Vec<String>, NppatchError> {
    if !objects_dir.is_dir() {
        return Err(NppatchError::PermissionSet(format!(
            "objects directory not found: {}",
            objects_dir.display()
        )));
    }
    let mut objects = Vec::new();
    for entry in std::fs::read_dir(objects_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            objects.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    objects.sort();
    Ok(objects)
}

/// Sorted custom field names (`__c`) defined for `object`.
pub fn list_custom_fields(
    objects_dir: &Path,
    object: &str,
) -> Result<Vec<String>, NppatchError> {
    let fields_dir = objects_dir.join(object).join("fields");
    if !fields_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut fields = Vec::new();
    for entry in std::fs::read_dir(&fields_dir)? {
        let file_name = entry?.file_name().to_string_lossy().into_owned();
        if let Some(name) = file_name.strip_suffix(FIELD_META_SUFFIX) {
            if name.ends_with("__c") {
                fields.push(name.to_string());
            }
        }
    }
    fields.sort();
    Ok(fields)
}

/// Field-level grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPermission {
    /// `Object.Field`, namespace tokens applied.
    pub field: String,
    pub editable: bool,
}

/// Generated permission set contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    pub field_permissions: Vec<FieldPermission>,
    /// Objects with full CRUD, namespace tokens applied.
    pub object_permissions: Vec<String>,
    /// `Object.Field` entries left out because they accept no permission.
    pub skipped_fields: Vec<String>,
}

impl PermissionSet {
    /// Scan `objects_dir` and collect every grant.
    ///
    /// Standard objects only contribute their custom fields. Their CRUD access
    /// comes from the user's profile.
    pub fn from_objects_dir(objects_dir: &Path) -> Result<Self, NppatchError> {
        let objects = list_objects(objects_dir)?;
        let mut set = Self::default();

        for object in &objects {
            let ns_object = with_namespace(object);
            for field in list_custom_fields(objects_dir, object)? {
                let path = objects_dir
                    .join(object)
                    .join("fields")
                    .join(format!("{field}{FIELD_META_SUFFIX}"));
                let editable = match field_access(&path) {
                    FieldAccess::Skip => {
                        set.skipped_fields.push(format!("{object}.{field}"));
                        continue;
                    }
                    FieldAccess::ReadOnly => false,
                    FieldAccess::ReadWrite => true,
                };
                set.field_permissions.push(FieldPermission {
                    field: format!("{ns_object}.{}", with_namespace(&field)),
                    editable,
                });
            }
        }

        set.object_permissions = objects
            .iter()
            .filter(|o| grants_object_access(o))
            .map(|o| with_namespace(o))
            .collect();

        info!(
            "permission set: {} objects, {} field permissions, {} skipped fields",
            set.object_permissions.len(),
            set.field_permissions.len(),
            set.skipped_fields.len()
        );
        Ok(set)
    }

    /// Render as `PermissionSet` metadata XML.
    pub fn to_xml(&self) -> Result<String, NppatchError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(
            BytesStart::new("PermissionSet").with_attributes([("xmlns", METADATA_NS)]),
        ))?;

        write_text_element(&mut writer, "description", DESCRIPTION)?;
        write_text_element(&mut writer, "hasActivationRequired", "false")?;
        write_text_element(&mut writer, "label", LABEL)?;
        write_text_element(&mut writer, "license", LICENSE)?;

        for perm in &self.field_permissions {
            writer.write_event(Event::Start(BytesStart::new("fieldPermissions")))?;
            write_text_element(&mut writer, "editable", bool_text(perm.editable))?;
            write_text_element(&mut writer, "field", &perm.field)?;
            write_text_element(&mut writer, "readable", "true")?;
            writer.write_event(Event::End(BytesEnd::new("fieldPermissions")))?;
        }

        for object in &self.object_permissions {
            writer.write_event(Event::Start(BytesStart::new("objectPermissions")))?;
            write_text_element(&mut writer, "allowCreate", "true")?;
            write_text_element(&mut writer, "allowDelete", "true")?;
            write_text_element(&mut writer, "allowEdit", "true")?;
            write_text_element(&mut writer, "allowRead", "true")?;
            write_text_element(&mut writer, "modifyAllRecords", "true")?;
            write_text_element(&mut writer, "object", object)?;
            write_text_element(&mut writer, "viewAllRecords", "true")?;
            writer.write_event(Event::End(BytesEnd::new("objectPermissions")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("PermissionSet")))?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| NppatchError::PermissionSet(format!("generated invalid UTF-8: {e}")))?;
        xml.push('\n');
        Ok(xml)
    }

    /// Write the XML to `output`, creating parent directories.
    pub fn write(&self, output: &Path) -> Result<(), NppatchError> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, self.to_xml()?)?;
        info!("permission set: wrote {}", output.display());
        Ok(())
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), NppatchError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
