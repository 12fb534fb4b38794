//! Conversion command parameters and their persisted defaults

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const YES_NO: &[&str] = &["*YES", "*NO"];
pub const CASE_VALUES: &[&str] = &["*UPPER", "*LOWER", "*MIXED"];
pub const CONVERT_LEVELS: &[&str] = &["*NO", "*BASE", "*ADVANCED"];
pub const TRUNCATION_VALUES: &[&str] = &["*WNG1", "*WNG2", "*YES", "*NO"];
pub const INDICATOR_VALUES: &[&str] = &["*WNG1", "*YES", "*NO"];
pub const ALPHTONUM_VALUES: &[&str] = &["*WNG1", "*YES", "*NO"];
pub const EMPTY_COMMENT_VALUES: &[&str] = &["*KEEP", "*BLANK", "*ONELINE", "*REMOVE"];
pub const PRECOMPILER_VALUES: &[&str] = &["*ARCAD", "*ALDON"];
pub const SOURCE_DATE_VALUES: &[&str] = &["*ZERO", "*CURRENT", "*KEEP"];
pub const FLAG_CONVERTED_VALUES: &[&str] = &["*NO", "*YES", "*KEEP"];

/// Options handed to the remote conversion utility.
///
/// The string fields carry the utility's sentinel values (`*YES`, `*MIXED`,
/// `*WNG1`, ...) verbatim. Persisted as the user's last-used defaults;
/// per-run source coordinates are supplied at command generation time and
/// never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct CommandParams {
    pub cvtclcspec: String,
    pub cvtdclspec: String,
    pub expcspecpy: String,
    pub fullyfree: String,
    pub maxnotfree: String,
    pub firstcol: String,
    pub useparmnum: String,
    pub tosrclib: String,
    pub tosrcfile: String,
    pub tosrcmbr: String,
    pub replace: String,
    pub cvt_call: String,
    pub cvt_goto: String,
    pub tagfldname: String,
    pub cvt_klist: String,
    pub cvt_movea: String,
    pub indent: String,
    pub indentcmt: String,
    pub opcodecase: String,
    pub bltfnccase: String,
    pub spcwrdcase: String,
    pub keywrdcase: String,
    pub flgcvttype: String,
    pub clrxref: String,
    pub clrfrmchg: String,
    pub precpl: String,
    pub srcdate: String,
    pub cvt_subr: String,
    pub checkind: String,
    pub scanind: String,
    pub lookupind: String,
    pub numtruncz: String,
    pub numtrunca: String,
    pub numtruncb: String,
    pub numtruncm: String,
    pub numtruncd: String,
    pub emptycmt: String,
    pub alphtonum: String,
    pub keepdsind: String,
}

impl Default for CommandParams {
    fn default() -> Self {
        CommandParams {
            cvtclcspec: "*FREE".into(),
            cvtdclspec: "*YES".into(),
            expcspecpy: "*NO".into(),
            fullyfree: "*YES".into(),
            maxnotfree: "*NONE".into(),
            firstcol: "1".into(),
            useparmnum: "*NO".into(),
            tosrclib: String::new(),
            tosrcfile: "*NONE".into(),
            tosrcmbr: "*FROMMBR".into(),
            replace: "*NO".into(),
            cvt_call: "*YES".into(),
            cvt_goto: "*ADVANCED".into(),
            tagfldname: "ATag".into(),
            cvt_klist: "*YES".into(),
            cvt_movea: "*ADVANCED".into(),
            indent: "2".into(),
            indentcmt: "*YES".into(),
            opcodecase: "*MIXED".into(),
            bltfnccase: "*MIXED".into(),
            spcwrdcase: "*MIXED".into(),
            keywrdcase: "*MIXED".into(),
            flgcvttype: "*NO".into(),
            clrxref: "*YES".into(),
            clrfrmchg: "*YES".into(),
            precpl: "*ARCAD".into(),
            srcdate: "*CURRENT".into(),
            cvt_subr: "*NO".into(),
            checkind: "*WNG1".into(),
            scanind: "*WNG1".into(),
            lookupind: "*WNG1".into(),
            numtruncz: "*YES".into(),
            numtrunca: "*YES".into(),
            numtruncb: "*NO".into(),
            numtruncm: "*YES".into(),
            numtruncd: "*YES".into(),
            emptycmt: "*KEEP".into(),
            alphtonum: "*YES".into(),
            keepdsind: "*NO".into(),
        }
    }
}

fn one_of(parameter: &str, value: &str, allowed: &[&str]) -> Result<String> {
    let upper = value.trim().to_uppercase();
    if allowed.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(Error::InvalidParameterValue {
            parameter: parameter.into(),
            value: value.into(),
            expected: allowed.join(", "),
        })
    }
}

fn numeric(parameter: &str, value: &str, min: u32, max: u32) -> Result<String> {
    match value.trim().parse::<u32>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n.to_string()),
        _ => Err(Error::InvalidParameterValue {
            parameter: parameter.into(),
            value: value.into(),
            expected: format!("{min}-{max}"),
        }),
    }
}

impl CommandParams {
    /// Assign one parameter by its utility keyword, validating the value
    /// against the keyword's accepted set.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = key.trim().to_uppercase();
        match key.as_str() {
            "CVTCLCSPEC" => self.cvtclcspec = one_of(&key, value, &["*FREE"])?,
            "CVTDCLSPEC" => self.cvtdclspec = one_of(&key, value, YES_NO)?,
            "EXPCSPECPY" => self.expcspecpy = one_of(&key, value, YES_NO)?,
            "FULLYFREE" => self.fullyfree = one_of(&key, value, YES_NO)?,
            "MAXNOTFREE" => {
                self.maxnotfree = if value.trim().eq_ignore_ascii_case("*NONE") {
                    "*NONE".into()
                } else {
                    numeric(&key, value, 1, 9999)?
                }
            }
            "FIRSTCOL" => self.firstcol = numeric(&key, value, 1, 99)?,
            "USEPARMNUM" => self.useparmnum = one_of(&key, value, YES_NO)?,
            "TOSRCLIB" => self.tosrclib = value.trim().to_uppercase(),
            "TOSRCFILE" => self.tosrcfile = value.trim().to_uppercase(),
            "TOSRCMBR" => self.tosrcmbr = value.trim().to_uppercase(),
            "REPLACE" => self.replace = one_of(&key, value, YES_NO)?,
            "CVT_CALL" => self.cvt_call = one_of(&key, value, YES_NO)?,
            "CVT_GOTO" => self.cvt_goto = one_of(&key, value, CONVERT_LEVELS)?,
            "TAGFLDNAME" => self.tagfldname = value.trim().to_string(),
            "CVT_KLIST" => self.cvt_klist = one_of(&key, value, YES_NO)?,
            "CVT_MOVEA" => self.cvt_movea = one_of(&key, value, CONVERT_LEVELS)?,
            "INDENT" => self.indent = numeric(&key, value, 0, 5)?,
            "INDENTCMT" => self.indentcmt = one_of(&key, value, YES_NO)?,
            "OPCODECASE" => self.opcodecase = one_of(&key, value, CASE_VALUES)?,
            "BLTFNCCASE" => self.bltfnccase = one_of(&key, value, CASE_VALUES)?,
            "SPCWRDCASE" => self.spcwrdcase = one_of(&key, value, CASE_VALUES)?,
            "KEYWRDCASE" => self.keywrdcase = one_of(&key, value, CASE_VALUES)?,
            "FLGCVTTYPE" => self.flgcvttype = one_of(&key, value, FLAG_CONVERTED_VALUES)?,
            "CLRXREF" => self.clrxref = one_of(&key, value, YES_NO)?,
            "CLRFRMCHG" => self.clrfrmchg = one_of(&key, value, YES_NO)?,
            "PRECPL" => self.precpl = one_of(&key, value, PRECOMPILER_VALUES)?,
            "SRCDATE" => self.srcdate = one_of(&key, value, SOURCE_DATE_VALUES)?,
            "CVT_SUBR" => self.cvt_subr = one_of(&key, value, YES_NO)?,
            "CHECKIND" => self.checkind = one_of(&key, value, INDICATOR_VALUES)?,
            "SCANIND" => self.scanind = one_of(&key, value, INDICATOR_VALUES)?,
            "LOOKUPIND" => self.lookupind = one_of(&key, value, INDICATOR_VALUES)?,
            "NUMTRUNCZ" => self.numtruncz = one_of(&key, value, TRUNCATION_VALUES)?,
            "NUMTRUNCA" => self.numtrunca = one_of(&key, value, TRUNCATION_VALUES)?,
            "NUMTRUNCB" => self.numtruncb = one_of(&key, value, TRUNCATION_VALUES)?,
            "NUMTRUNCM" => self.numtruncm = one_of(&key, value, TRUNCATION_VALUES)?,
            "NUMTRUNCD" => self.numtruncd = one_of(&key, value, TRUNCATION_VALUES)?,
            "EMPTYCMT" => self.emptycmt = one_of(&key, value, EMPTY_COMMENT_VALUES)?,
            "ALPHTONUM" => self.alphtonum = one_of(&key, value, ALPHTONUM_VALUES)?,
            "KEEPDSIND" => self.keepdsind = one_of(&key, value, YES_NO)?,
            _ => return Err(Error::UnknownParameter(key)),
        }
        Ok(())
    }

    /// Keyword/value pairs of the persisted parameters, in the order the
    /// remote utility documents them.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("CVTCLCSPEC", self.cvtclcspec.as_str()),
            ("CVTDCLSPEC", self.cvtdclspec.as_str()),
            ("EXPCSPECPY", self.expcspecpy.as_str()),
            ("FULLYFREE", self.fullyfree.as_str()),
            ("MAXNOTFREE", self.maxnotfree.as_str()),
            ("FIRSTCOL", self.firstcol.as_str()),
            ("USEPARMNUM", self.useparmnum.as_str()),
            ("TOSRCLIB", self.tosrclib.as_str()),
            ("TOSRCFILE", self.tosrcfile.as_str()),
            ("TOSRCMBR", self.tosrcmbr.as_str()),
            ("REPLACE", self.replace.as_str()),
            ("CVT_CALL", self.cvt_call.as_str()),
            ("CVT_GOTO", self.cvt_goto.as_str()),
            ("TAGFLDNAME", self.tagfldname.as_str()),
            ("CVT_KLIST", self.cvt_klist.as_str()),
            ("CVT_MOVEA", self.cvt_movea.as_str()),
            ("INDENT", self.indent.as_str()),
            ("INDENTCMT", self.indentcmt.as_str()),
            ("OPCODECASE", self.opcodecase.as_str()),
            ("BLTFNCCASE", self.bltfnccase.as_str()),
            ("SPCWRDCASE", self.spcwrdcase.as_str()),
            ("KEYWRDCASE", self.keywrdcase.as_str()),
            ("FLGCVTTYPE", self.flgcvttype.as_str()),
            ("CLRXREF", self.clrxref.as_str()),
            ("CLRFRMCHG", self.clrfrmchg.as_str()),
            ("PRECPL", self.precpl.as_str()),
            ("SRCDATE", self.srcdate.as_str()),
            ("CVT_SUBR", self.cvt_subr.as_str()),
            ("CHECKIND", self.checkind.as_str()),
            ("SCANIND", self.scanind.as_str()),
            ("LOOKUPIND", self.lookupind.as_str()),
            ("NUMTRUNCZ", self.numtruncz.as_str()),
            ("NUMTRUNCA", self.numtrunca.as_str()),
            ("NUMTRUNCB", self.numtruncb.as_str()),
            ("NUMTRUNCM", self.numtruncm.as_str()),
            ("NUMTRUNCD", self.numtruncd.as_str()),
            ("EMPTYCMT", self.emptycmt.as_str()),
            ("ALPHTONUM", self.alphtonum.as_str()),
            ("KEEPDSIND", self.keepdsind.as_str()),
        ]
    }
}
