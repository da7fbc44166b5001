//! Gene → disease associations and hereditary cancer syndrome panels.

use std::collections::HashMap;
use std::sync::OnceLock;

use medifuse_common::assessment::Inheritance;

/// Clinical annotation for one gene.
#[derive(Debug, Clone)]
pub struct GeneInfo {
    pub symbol: &'static str,
    pub conditions: &'static [&'static str],
    pub inheritance: Inheritance,
    /// Code of the syndrome panel this gene belongs to, if any.
    pub syndrome: Option<&'static str>,
    /// Lifetime risk increase carried by a pathogenic variant, in [0, 1].
    pub lifetime_risk_increase: f64,
    pub screening: &'static [&'static str],
}

/// A named hereditary syndrome and the genes whose pathogenic variants explain it.
#[derive(Debug, Clone)]
pub struct Syndrome {
    pub code: &'static str,
    pub name: &'static str,
    pub genes: &'static [&'static str],
}

static GENES: &[GeneInfo] = &[
    GeneInfo {
        symbol: "BRCA1",
        conditions: &["Breast Cancer", "Ovarian Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("HBOC"),
        lifetime_risk_increase: 0.8,
        screening: &[
            "Annual breast MRI and mammography starting at age 30",
            "Discuss risk-reducing salpingo-oophorectomy",
        ],
    },
    GeneInfo {
        symbol: "BRCA2",
        conditions: &["Breast Cancer", "Ovarian Cancer", "Prostate Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("HBOC"),
        lifetime_risk_increase: 0.75,
        screening: &[
            "Annual breast MRI and mammography starting at age 30",
            "Discuss risk-reducing salpingo-oophorectomy",
            "Prostate cancer screening from age 40",
        ],
    },
    GeneInfo {
        symbol: "PALB2",
        conditions: &["Breast Cancer", "Pancreatic Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("HBOC"),
        lifetime_risk_increase: 0.55,
        screening: &["Annual breast MRI and mammography starting at age 30"],
    },
    GeneInfo {
        symbol: "TP53",
        conditions: &["Li-Fraumeni Syndrome", "Various Cancers"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("LFS"),
        lifetime_risk_increase: 0.9,
        screening: &["Annual whole-body MRI surveillance", "Annual breast MRI starting at age 20"],
    },
    GeneInfo {
        symbol: "MLH1",
        conditions: &["Lynch Syndrome", "Colorectal Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("LYNCH"),
        lifetime_risk_increase: 0.7,
        screening: &[
            "Colonoscopy every 1-2 years starting at age 20-25",
            "Discuss endometrial cancer screening",
        ],
    },
    GeneInfo {
        symbol: "MSH2",
        conditions: &["Lynch Syndrome", "Colorectal Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("LYNCH"),
        lifetime_risk_increase: 0.7,
        screening: &[
            "Colonoscopy every 1-2 years starting at age 20-25",
            "Discuss endometrial cancer screening",
        ],
    },
    GeneInfo {
        symbol: "MSH6",
        conditions: &["Lynch Syndrome", "Colorectal Cancer", "Endometrial Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("LYNCH"),
        lifetime_risk_increase: 0.5,
        screening: &[
            "Colonoscopy every 1-2 years starting at age 30",
            "Discuss endometrial cancer screening",
        ],
    },
    GeneInfo {
        symbol: "PMS2",
        conditions: &["Lynch Syndrome", "Colorectal Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("LYNCH"),
        lifetime_risk_increase: 0.4,
        screening: &["Colonoscopy every 1-2 years starting at age 30"],
    },
    GeneInfo {
        symbol: "APC",
        conditions: &["Familial Adenomatous Polyposis", "Colorectal Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("FAP"),
        lifetime_risk_increase: 0.85,
        screening: &["Annual colonoscopy starting at age 10-12"],
    },
    GeneInfo {
        symbol: "PTEN",
        conditions: &["Cowden Syndrome", "Various Cancers"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("PHTS"),
        lifetime_risk_increase: 0.6,
        screening: &["Annual thyroid ultrasound", "Annual breast MRI starting at age 30"],
    },
    GeneInfo {
        symbol: "RB1",
        conditions: &["Retinoblastoma", "Osteosarcoma"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("RB"),
        lifetime_risk_increase: 0.8,
        screening: &["Regular dilated eye examinations"],
    },
    GeneInfo {
        symbol: "MEN1",
        conditions: &["Multiple Endocrine Neoplasia"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("MEN1"),
        lifetime_risk_increase: 0.65,
        screening: &["Annual biochemical screening for endocrine tumors"],
    },
    GeneInfo {
        symbol: "RET",
        conditions: &["Multiple Endocrine Neoplasia Type 2", "Medullary Thyroid Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("MEN2"),
        lifetime_risk_increase: 0.85,
        screening: &["Discuss prophylactic thyroidectomy with an endocrine surgeon"],
    },
    GeneInfo {
        symbol: "VHL",
        conditions: &["Von Hippel-Lindau Syndrome", "Kidney Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("VHL"),
        lifetime_risk_increase: 0.7,
        screening: &["Annual abdominal imaging and retinal examination"],
    },
    GeneInfo {
        symbol: "CDH1",
        conditions: &["Diffuse Gastric Cancer", "Lobular Breast Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("HDGC"),
        lifetime_risk_increase: 0.7,
        screening: &["Discuss prophylactic gastrectomy with a specialist"],
    },
    GeneInfo {
        symbol: "STK11",
        conditions: &["Peutz-Jeghers Syndrome", "Various Cancers"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: Some("PJS"),
        lifetime_risk_increase: 0.75,
        screening: &["Upper and lower endoscopy every 2-3 years"],
    },
    GeneInfo {
        symbol: "ATM",
        conditions: &["Breast Cancer", "Pancreatic Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: None,
        lifetime_risk_increase: 0.3,
        screening: &["Enhanced breast screening starting at age 40"],
    },
    GeneInfo {
        symbol: "CHEK2",
        conditions: &["Breast Cancer", "Colorectal Cancer"],
        inheritance: Inheritance::AutosomalDominant,
        syndrome: None,
        lifetime_risk_increase: 0.3,
        screening: &["Enhanced breast screening starting at age 40"],
    },
];

static SYNDROMES: &[Syndrome] = &[
    Syndrome { code: "HBOC",  name: "Hereditary Breast and Ovarian Cancer Syndrome", genes: &["BRCA1", "BRCA2", "PALB2"] },
    Syndrome { code: "LYNCH", name: "Lynch Syndrome",                                  genes: &["MLH1", "MSH2", "MSH6", "PMS2"] },
    Syndrome { code: "LFS",   name: "Li-Fraumeni Syndrome",                            genes: &["TP53"] },
    Syndrome { code: "FAP",   name: "Familial Adenomatous Polyposis",                  genes: &["APC"] },
    Syndrome { code: "PHTS",  name: "PTEN Hamartoma Tumor Syndrome",                   genes: &["PTEN"] },
    Syndrome { code: "MEN1",  name: "Multiple Endocrine Neoplasia Type 1",             genes: &["MEN1"] },
    Syndrome { code: "MEN2",  name: "Multiple Endocrine Neoplasia Type 2",             genes: &["RET"] },
    Syndrome { code: "VHL",   name: "Von Hippel-Lindau Syndrome",                      genes: &["VHL"] },
    Syndrome { code: "HDGC",  name: "Hereditary Diffuse Gastric Cancer",               genes: &["CDH1"] },
    Syndrome { code: "PJS",   name: "Peutz-Jeghers Syndrome",                          genes: &["STK11"] },
    Syndrome { code: "RB",    name: "Hereditary Retinoblastoma",                       genes: &["RB1"] },
];

fn gene_index() -> &'static HashMap<&'static str, &'static GeneInfo> {
    static INDEX: OnceLock<HashMap<&'static str, &'static GeneInfo>> = OnceLock::new();
    INDEX.get_or_init(|| GENES.iter().map(|g| (g.symbol, g)).collect())
}

/// Look up a gene by symbol. Symbols are matched case-insensitively.
pub fn gene_info(symbol: &str) -> Option<&'static GeneInfo> {
    let upper = symbol.trim().to_ascii_uppercase();
    gene_index().get(upper.as_str()).copied()
}

/// Known syndromes in reporting order.
pub fn syndromes() -> &'static [Syndrome] {
    SYNDROMES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_lookup_case_insensitive() {
        let brca1 = gene_info("brca1").unwrap();
        assert_eq!(brca1.symbol, "BRCA1");
        assert_eq!(brca1.syndrome, Some("HBOC"));
        assert!(gene_info("NOTAGENE").is_none());
    }

    #[test]
    fn test_every_syndrome_gene_is_annotated() {
        for syndrome in syndromes() {
            for gene in syndrome.genes {
                let info = gene_info(gene).unwrap_or_else(|| panic!("{gene} missing"));
                assert_eq!(info.syndrome, Some(syndrome.code));
            }
        }
    }

    #[test]
    fn test_lifetime_risks_in_unit_interval() {
        for gene in GENES {
            assert!((0.0..=1.0).contains(&gene.lifetime_risk_increase), "{}", gene.symbol);
            assert!(!gene.conditions.is_empty());
        }
    }
}
