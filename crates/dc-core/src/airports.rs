//! Default airport-code table.
//!
//! Codes are grouped by the zone they land in. US airports map to `OUTSIDE`
//! so a flight home ends the previous zone's streak.

use std::collections::BTreeMap;

use crate::zone::OUTSIDE;

const SCHENGEN: &[&str] = &[
    // Poland
    "WAW", "KRK", "KTW", "GDN", "POZ", "SZZ", "WRO", "RZE", "LCJ", "LUZ",
    // France
    "CDG", "ORY", "LYS", "NCE", "MRS", "BOD", "TLS",
    // Germany
    "FRA", "MUC", "TXL", "BER", "HAM", "DUS", "CGN", "STR",
    // Netherlands
    "AMS", "EIN", "RTM",
    // Austria
    "VIE", "SZG",
    // Switzerland
    "ZRH", "GVA", "BSL",
    // Spain
    "MAD", "BCN", "AGP", "PMI", "ALC", "VLC",
    // Italy
    "FCO", "MXP", "LIN", "VCE", "NAP", "BLQ",
    // Belgium
    "BRU", "CRL",
    // Nordics
    "CPH", "ARN", "GOT", "OSL", "HEL", "KEF",
    // Portugal
    "LIS", "OPO", "FAO",
    // Central and Baltic
    "PRG", "BUD", "BTS", "LJU", "LUX", "TLL", "RIX", "VNO", "MLA",
];

const UK: &[&str] = &[
    "LHR", "LGW", "LTN", "STN", "LCY", "MAN", "EDI", "GLA", "BRS", "BHX",
];

const UKRAINE: &[&str] = &["IEV", "KBP", "ODS", "LWO", "HRK"];

const UNITED_STATES: &[&str] = &[
    "JFK", "EWR", "LGA", "BOS", "ORD", "LAX", "SFO", "SEA", "MIA", "DFW", "DEN", "IAD", "DCA",
    "ATL", "PHL", "DTW", "MSP", "CLT", "PHX", "IAH", "SAN", "TPA", "FLL", "BWI", "MDW", "SJC",
    "AUS", "DAL", "HOU", "OAK", "MCO", "SLC", "PDX", "STL", "CLE", "CMH", "CVG", "PIT", "MKE",
    "SMF", "RDU", "MCI", "BNA", "MSY", "SAT", "IND", "JAX", "OKC", "OMA", "RIC", "SDF", "TUL",
    "ABQ", "ELP", "ONT", "BUR", "LGB", "BOI", "TUS", "ANC",
];

/// Airport code to zone name, matching the default zone names.
pub fn default_airports() -> BTreeMap<String, String> {
    [
        (SCHENGEN, "SCHENGEN"),
        (UK, "UK"),
        (UKRAINE, "UKRAINE"),
        (UNITED_STATES, OUTSIDE),
    ]
    .into_iter()
    .flat_map(|(codes, zone)| codes.iter().map(move |code| ((*code).to_string(), zone.to_string())))
    .collect()
}
