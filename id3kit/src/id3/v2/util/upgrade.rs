//! Utilities for converting between ID3v2.2 and ID3v2.3/4 frame IDs
//!
//! ID3v2.2 uses 3 character frame IDs. When reading an ID3v2.2 tag, IDs are upgraded to their
//! 4 character counterparts, so frames can be handled the same regardless of version. When writing
//! an ID3v2.2 tag, they are converted back.

use std::collections::HashMap;

/// Upgrade an ID3v2.2 key to an ID3v2.3/4 key
///
/// # Examples
///
/// ```rust
/// use id3kit::id3::v2::upgrade_v2;
///
/// assert_eq!(upgrade_v2("TT2"), Some("TIT2"));
/// assert_eq!(upgrade_v2("PIC"), Some("APIC"));
/// assert_eq!(upgrade_v2("XYZ"), None);
/// ```
pub fn upgrade_v2(key: &str) -> Option<&'static str> {
	v2_to_v3_keys().get(key).copied()
}

/// Downgrade an ID3v2.3/4 key to an ID3v2.2 key
///
/// # Examples
///
/// ```rust
/// use id3kit::id3::v2::downgrade_v2;
///
/// assert_eq!(downgrade_v2("TIT2"), Some("TT2"));
/// assert_eq!(downgrade_v2("COMM"), Some("COM"));
/// // No ID3v2.2 counterpart
/// assert_eq!(downgrade_v2("TDRC"), None);
/// ```
pub fn downgrade_v2(key: &str) -> Option<&'static str> {
	v3_to_v2_keys().get(key).copied()
}

macro_rules! gen_upgrades {
	($($v2_key:literal => $v3_key:literal),+ $(,)?) => {
		use std::sync::OnceLock;

		const ID_PAIRS: &[(&str, &str)] = &[$(($v2_key, $v3_key)),+];

		fn v2_to_v3_keys() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| ID_PAIRS.iter().copied().collect())
		}

		fn v3_to_v2_keys() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| ID_PAIRS.iter().map(|(v2, v3)| (*v3, *v2)).collect())
		}
	};
}

gen_upgrades!(
	// Standard frames
	"BUF" => "RBUF",
	"CNT" => "PCNT",
	"COM" => "COMM",
	"CRA" => "AENC",
	"EQU" => "EQUA",
	"ETC" => "ETCO",
	"GEO" => "GEOB",
	"IPL" => "IPLS",
	"LNK" => "LINK",
	"MCI" => "MCDI",
	"MLL" => "MLLT",
	"PIC" => "APIC",
	"POP" => "POPM",
	"REV" => "RVRB",
	"RVA" => "RVAD",
	"SLT" => "SYLT",
	"STC" => "SYTC",
	"TAL" => "TALB",
	"TBP" => "TBPM",
	"TCM" => "TCOM",
	"TCO" => "TCON",
	"TCR" => "TCOP",
	"TDA" => "TDAT",
	"TDY" => "TDLY",
	"TEN" => "TENC",
	"TFT" => "TFLT",
	"TIM" => "TIME",
	"TKE" => "TKEY",
	"TLA" => "TLAN",
	"TLE" => "TLEN",
	"TMT" => "TMED",
	"TOA" => "TOPE",
	"TOF" => "TOFN",
	"TOL" => "TOLY",
	"TOR" => "TORY",
	"TOT" => "TOAL",
	"TP1" => "TPE1",
	"TP2" => "TPE2",
	"TP3" => "TPE3",
	"TP4" => "TPE4",
	"TPA" => "TPOS",
	"TPB" => "TPUB",
	"TRC" => "TSRC",
	"TRD" => "TRDA",
	"TRK" => "TRCK",
	"TSI" => "TSIZ",
	"TSS" => "TSSE",
	"TT1" => "TIT1",
	"TT2" => "TIT2",
	"TT3" => "TIT3",
	"TXT" => "TEXT",
	"TXX" => "TXXX",
	"TYE" => "TYER",
	"UFI" => "UFID",
	"ULT" => "USLT",
	"WAF" => "WOAF",
	"WAR" => "WOAR",
	"WAS" => "WOAS",
	"WCM" => "WCOM",
	"WCP" => "WCOP",
	"WPB" => "WPUB",
	"WXX" => "WXXX",

	// iTunes non-standard frames
	"GP1" => "GRP1",
	"MVI" => "MVIN",
	"MVN" => "MVNM",
	"PCS" => "PCST",
	"TCP" => "TCMP",
	"TCT" => "TCAT",
	"TDR" => "TDRL",
	"TDS" => "TDES",
	"TID" => "TGID",
	"TS2" => "TSO2",
	"TSA" => "TSOA",
	"TSC" => "TSOC",
	"TSP" => "TSOP",
	"TST" => "TSOT",
	"WFD" => "WFED",
);

#[cfg(test)]
mod tests {
	use super::{ID_PAIRS, downgrade_v2, upgrade_v2};

	use std::collections::HashSet;

	#[test_log::test]
	fn mapping_is_one_to_one() {
		let v2: HashSet<_> = ID_PAIRS.iter().map(|(v2, _)| v2).collect();
		let v3: HashSet<_> = ID_PAIRS.iter().map(|(_, v3)| v3).collect();

		assert_eq!(v2.len(), ID_PAIRS.len());
		assert_eq!(v3.len(), ID_PAIRS.len());
	}

	#[test_log::test]
	fn round_trip() {
		for (v2, v3) in ID_PAIRS {
			assert_eq!(v2.len(), 3);
			assert_eq!(v3.len(), 4);
			assert_eq!(upgrade_v2(v2), Some(*v3));
			assert_eq!(downgrade_v2(v3), Some(*v2));
		}
	}
}
