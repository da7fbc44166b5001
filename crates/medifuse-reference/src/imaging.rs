//! Imaging finding catalogs keyed by (modality, body part).

use medifuse_common::assessment::FindingSeverity;
use medifuse_common::ImagingModality;

#[derive(Debug, Clone)]
pub struct CatalogFinding {
    pub finding: &'static str,
    pub severity: FindingSeverity,
    /// Prior probability of the finding for this study type.
    pub probability: f64,
    pub description: &'static str,
    /// Cancer-staging annotation, when the finding carries one.
    pub staging: Option<&'static str>,
}

/// All findings for one study type. The first entry is always the NORMAL finding.
#[derive(Debug, Clone)]
pub struct FindingCatalog {
    pub modality: ImagingModality,
    pub body_part: &'static str,
    pub findings: &'static [CatalogFinding],
}

impl FindingCatalog {
    pub fn key(&self) -> String {
        format!("{}/{}", self.modality.as_str(), self.body_part)
    }

    pub fn normal_finding(&self) -> &'static CatalogFinding {
        &self.findings[0]
    }

    pub fn abnormal_findings(&self) -> Vec<&'static CatalogFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity != FindingSeverity::Normal)
            .collect()
    }
}

const fn finding(
    finding: &'static str,
    severity: FindingSeverity,
    probability: f64,
    description: &'static str,
    staging: Option<&'static str>,
) -> CatalogFinding {
    CatalogFinding { finding, severity, probability, description, staging }
}

use FindingSeverity::{Critical, High, Low, Moderate, Normal};

static CATALOGS: &[FindingCatalog] = &[
    FindingCatalog {
        modality: ImagingModality::Xray,
        body_part: "CHEST",
        findings: &[
            finding("No acute cardiopulmonary abnormality", Normal, 0.70, "Clear lung fields and normal cardiac silhouette", None),
            finding("Cardiomegaly", Moderate, 0.15, "Enlarged cardiac silhouette suggesting cardiac strain", None),
            finding("Pulmonary nodule", High, 0.05, "Solitary nodule requiring characterisation by CT", None),
            finding("Pneumonia", Moderate, 0.08, "Focal consolidation consistent with infection", None),
            finding("Pleural effusion", Moderate, 0.02, "Fluid accumulation in the pleural space", None),
        ],
    },
    FindingCatalog {
        modality: ImagingModality::Ct,
        body_part: "CHEST",
        findings: &[
            finding("No significant abnormality", Normal, 0.60, "No pulmonary, mediastinal or pleural abnormality", None),
            finding("Pulmonary nodule < 6mm", Low, 0.20, "Small nodule below the follow-up size threshold", None),
            finding("Ground glass opacity", Moderate, 0.10, "Hazy parenchymal opacity of inflammatory or early neoplastic origin", None),
            finding("Suspicious mass", High, 0.05, "Spiculated pulmonary mass suspicious for malignancy", Some("Lung-RADS 4B")),
            finding("Lymphadenopathy", Moderate, 0.05, "Enlarged mediastinal lymph nodes", None),
        ],
    },
    FindingCatalog {
        modality: ImagingModality::Mri,
        body_part: "BRAIN",
        findings: &[
            finding("No acute intracranial abnormality", Normal, 0.65, "Normal ventricular size without mass effect", None),
            finding("White matter changes", Low, 0.15, "Scattered white matter hyperintensities", None),
            finding("Small vessel disease", Moderate, 0.10, "Chronic microvascular ischaemic change", None),
            finding("Mass lesion", High, 0.05, "Enhancing intracranial lesion requiring neurosurgical review", None),
            finding("Acute infarct", Critical, 0.05, "Restricted diffusion consistent with acute stroke", None),
        ],
    },
    FindingCatalog {
        modality: ImagingModality::Ct,
        body_part: "ABDOMEN",
        findings: &[
            finding("No acute abnormality", Normal, 0.60, "Solid organs and bowel unremarkable", None),
            finding("Hepatic steatosis", Low, 0.20, "Diffuse fatty infiltration of the liver", None),
            finding("Renal cyst", Low, 0.10, "Simple cortical cyst without enhancing component", None),
            finding("Hepatic lesion", Moderate, 0.05, "Indeterminate focal liver lesion", None),
            finding("Pancreatic abnormality", High, 0.05, "Pancreatic mass or ductal dilatation", Some("Suspected pancreatic neoplasm, TNM staging required")),
        ],
    },
    FindingCatalog {
        modality: ImagingModality::Mammogram,
        body_part: "BREAST",
        findings: &[
            finding("No mammographic evidence of malignancy", Normal, 0.75, "Scattered fibroglandular tissue without suspicious features", None),
            finding("Benign calcifications", Low, 0.12, "Coarse calcifications with benign morphology", None),
            finding("Focal asymmetry", Moderate, 0.07, "Asymmetric density requiring diagnostic views", None),
            finding("Suspicious mass", High, 0.04, "Irregular mass with indistinct margins", Some("BI-RADS 4")),
            finding("Spiculated mass with microcalcifications", Critical, 0.02, "Highly suggestive of malignancy", Some("BI-RADS 5")),
        ],
    },
    FindingCatalog {
        modality: ImagingModality::Xray,
        body_part: "SPINE",
        findings: &[
            finding("Normal spinal alignment", Normal, 0.70, "Preserved vertebral heights and disc spaces", None),
            finding("Degenerative disc disease", Low, 0.15, "Disc space narrowing with osteophyte formation", None),
            finding("Osteopenia", Low, 0.07, "Reduced bone density", None),
            finding("Compression fracture", Moderate, 0.06, "Loss of vertebral body height", None),
            finding("Lytic lesion", High, 0.02, "Destructive vertebral lesion suspicious for metastasis", Some("Suspected skeletal metastasis, staging workup required")),
        ],
    },
];

/// Catalog for a study type, falling back to XRAY/CHEST for unknown keys.
/// `body_part` is expected already trimmed and uppercased.
pub fn finding_catalog(modality: ImagingModality, body_part: &str) -> &'static FindingCatalog {
    CATALOGS
        .iter()
        .find(|c| c.modality == modality && c.body_part == body_part)
        .unwrap_or(&CATALOGS[0])
}

/// Domain risk score for an aggregate finding severity.
pub fn severity_risk_score(severity: FindingSeverity) -> f64 {
    match severity {
        Critical => 0.9,
        High     => 0.7,
        Moderate => 0.5,
        Low      => 0.3,
        Normal   => 0.1,
    }
}

pub fn severity_recommendations(severity: FindingSeverity) -> &'static [&'static str] {
    match severity {
        Normal => &[
            "No immediate follow-up required",
            "Continue routine screening as recommended",
        ],
        Low => &["Consider follow-up imaging in 6-12 months"],
        Moderate => &[
            "Recommend follow-up imaging in 3-6 months",
            "Consider specialist consultation",
        ],
        High | Critical => &[
            "Urgent specialist consultation recommended",
            "Additional imaging or biopsy may be needed",
            "Priority follow-up within 1-2 weeks",
        ],
    }
}
