//! Conversion command generation

use crate::models::{CommandParams, ObjectType, SourceMember};

/// Name of the remote conversion utility command.
pub const CONVERTER: &str = "ACVTRPGFRE";

/// Destination source file, resolved from the parameter bag. The sentinels
/// `*FROMFILE` and `*NONE` pass through untouched; anything else is
/// qualified with `TOSRCLIB` when one is set.
pub fn resolve_to_src_file(params: &CommandParams) -> String {
    let file = params.tosrcfile.trim();
    if file.is_empty() {
        return "*NONE".to_string();
    }
    if file == "*FROMFILE" || file == "*NONE" {
        return file.to_string();
    }
    let library = params.tosrclib.trim();
    if library.is_empty() {
        file.to_string()
    } else {
        format!("{library}/{file}")
    }
}

/// Destination member: explicit parameter first, then the source member
/// name, then `*FROMMBR`.
pub fn resolve_to_src_mbr(params: &CommandParams, member: &str) -> String {
    let configured = params.tosrcmbr.trim();
    if !configured.is_empty() {
        configured.to_string()
    } else if !member.is_empty() {
        member.to_string()
    } else {
        "*FROMMBR".to_string()
    }
}

/// Build the full conversion invocation for one member.
///
/// Keyword order follows the utility's own parameter documentation so the
/// string diffs cleanly against a joblog echo.
pub fn conversion_command(
    product_library: &str,
    member: &SourceMember,
    object_type: Option<ObjectType>,
    params: &CommandParams,
) -> String {
    let objtype = object_type.unwrap_or(ObjectType::None);
    let parts = [
        format!("{}/{}", product_library, CONVERTER),
        format!("SRCFILE({}/{})", member.library, member.file),
        format!("SRCMBR({})", member.name),
        format!("SRCTYPE({})", member.extension),
        format!("OBJTYPE({})", objtype),
        format!("CVTCLCSPEC({})", params.cvtclcspec),
        format!("CVTDCLSPEC({})", params.cvtdclspec),
        format!("EXPCSPECPY({})", params.expcspecpy),
        format!("FULLYFREE({})", params.fullyfree),
        format!("MAXNOTFREE({})", params.maxnotfree),
        format!("FIRSTCOL({})", params.firstcol),
        format!("USEPARMNUM({})", params.useparmnum),
        format!("TOSRCFILE({})", resolve_to_src_file(params)),
        format!("TOSRCMBR({})", resolve_to_src_mbr(params, &member.name)),
        format!("REPLACE({})", params.replace),
        format!("CVT_CALL({})", params.cvt_call),
        format!("CVT_GOTO({})", params.cvt_goto),
        format!("TAGFLDNAME('{}')", params.tagfldname),
        format!("CVT_KLIST({})", params.cvt_klist),
        format!("CVT_MOVEA({})", params.cvt_movea),
        format!("INDENT({})", params.indent),
        format!("INDENTCMT({})", params.indentcmt),
        format!("OPCODECASE({})", params.opcodecase),
        format!("BLTFNCCASE({})", params.bltfnccase),
        format!("SPCWRDCASE({})", params.spcwrdcase),
        format!("KEYWRDCASE({})", params.keywrdcase),
        format!("FLGCVTTYPE({})", params.flgcvttype),
        format!("CLRXREF({})", params.clrxref),
        format!("CLRFRMCHG({})", params.clrfrmchg),
        format!("PRECPL({})", params.precpl),
        format!("SRCDATE({})", params.srcdate),
        format!("CVT_SUBR({})", params.cvt_subr),
        format!("CHECKIND({})", params.checkind),
        format!("SCANIND({})", params.scanind),
        format!("LOOKUPIND({})", params.lookupind),
        format!("NUMTRUNCZ({})", params.numtruncz),
        format!("NUMTRUNCA({})", params.numtrunca),
        format!("NUMTRUNCB({})", params.numtruncb),
        format!("NUMTRUNCM({})", params.numtruncm),
        format!("NUMTRUNCD({})", params.numtruncd),
        format!("EMPTYCMT({})", params.emptycmt),
        format!("ALPHTONUM({})", params.alphtonum),
        format!("KEEPDSIND({})", params.keepdsind),
    ];
    parts.join(" ")
}

/// Existence probe for the conversion utility in a candidate library.
pub fn check_product_command(library: &str) -> String {
    format!("CHKOBJ OBJ({library}/{CONVERTER}) OBJTYPE(*CMD)")
}

/// Where the converted source of `member` ends up, given the destination
/// parameters. `*NONE` and `*FROMFILE` both leave the converted member in
/// the source file.
pub fn converted_member(member: &SourceMember, params: &CommandParams) -> SourceMember {
    let to_file = resolve_to_src_file(params);
    let (library, file) = match to_file.as_str() {
        "*NONE" | "*FROMFILE" => (member.library.clone(), member.file.clone()),
        qualified => match qualified.split_once('/') {
            Some((library, file)) => (library.to_string(), file.to_string()),
            None => (member.library.clone(), qualified.to_string()),
        },
    };
    let name = match resolve_to_src_mbr(params, &member.name).as_str() {
        "*FROMMBR" => member.name.clone(),
        other => other.to_string(),
    };
    SourceMember {
        library,
        file,
        name,
        extension: member.extension.clone(),
        text: None,
    }
}
