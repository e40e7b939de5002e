//! One scan attempt: crop the field regions, OCR them, OCR and parse the
//! whole card, merge both reads and validate the result.
//!
//! A scan never fails on bad input or a misbehaving collaborator. A field
//! that cannot be cropped or recognized is read as empty, and a failed
//! whole-card pass is replaced by an empty parse so the ROI read can still
//! carry the scan.
use futures::future::join_all;
use idscan_ocr::{CardCropper, ImageCropper, OcrEngine, OcrProfile, RecognizeOptions};
use image::DynamicImage;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

use crate::field_text::{clean_roi_name, clean_split_name, extract_dob_from_text};
use crate::heuristics::{looks_like_dob, looks_like_id_token, looks_like_name};
use crate::id_numbers::extract_national_id_number;
use crate::id_type::IdType;
use crate::merge::{merge, RoiFields};
use crate::ocr_adapter::{OcrFieldAdapter, OcrFieldResult};
use crate::options::ScanOptions;
use crate::parsers::parse_text_by_id_type_at;
use crate::registry::get_descriptor;
use crate::roi::crop_fields_from_card;
use crate::templates::RoiSet;
use crate::types::{ExtractedInfo, FieldKey};
use crate::validation::{validate_at, ValidationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanState {
    Init,
    RoiCropped,
    RoiOcrDone,
    FullCardOcrDone,
    Merged,
    Validated,
    Done,
}

/// Everything collected along the way, for display and troubleshooting.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDiagnostics {
    /// Whether the ROI pass alone produced anything name-, date- or ID-shaped.
    pub roi_has_any_data: bool,
    pub roi_fields: RoiFields,
    pub roi_text: BTreeMap<FieldKey, String>,
    pub roi_confidence: BTreeMap<FieldKey, f32>,
    pub roi_person_names: BTreeMap<FieldKey, Vec<String>>,
    pub full_card_text: String,
    pub full_card_confidence: Option<f32>,
    pub full_card_person_names: Vec<String>,
    pub full_card_parsed: ExtractedInfo,
    pub states: Vec<ScanState>,
    #[serde(skip)]
    pub roi_images: HashMap<FieldKey, DynamicImage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub merged: ExtractedInfo,
    /// True only when the merged fields pass validation.
    pub has_useful_data: bool,
    pub validation: ValidationOutcome,
    pub diagnostics: ScanDiagnostics,
}

fn field_options(key: FieldKey) -> RecognizeOptions {
    let line = RecognizeOptions::line();
    match key {
        FieldKey::Dob => line.with_profile(OcrProfile::Dob),
        // Card numbers carry letters and "CRN-" prefixes; a digits-only hint would drop them.
        FieldKey::IdNumber => line,
        name if name.is_name_part() => line.with_profile(OcrProfile::Name),
        _ => line,
    }
}

fn advance(states: &mut Vec<ScanState>, next: ScanState) {
    debug!(state = ?next, "scan state");
    states.push(next);
}

pub struct ScanOrchestrator {
    cropper: Arc<dyn CardCropper>,
    ocr: OcrFieldAdapter,
    options: ScanOptions,
}

impl ScanOrchestrator {
    pub fn new(cropper: Arc<dyn CardCropper>, engine: Arc<dyn OcrEngine>, options: ScanOptions) -> Self {
        Self {
            cropper,
            ocr: OcrFieldAdapter::new(engine),
            options,
        }
    }

    /// Crops in-process with the `image` crate.
    pub fn with_image_cropper(engine: Arc<dyn OcrEngine>, options: ScanOptions) -> Self {
        let cropper = ImageCropper::new().with_min_size(options.min_crop_size);
        Self::new(Arc::new(cropper), engine, options)
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans with the built-in layout for `id_type`.
    pub async fn scan_with_defaults(&self, card: &DynamicImage, id_type: IdType) -> ScanResult {
        self.scan(card, &RoiSet::defaults(id_type)).await
    }

    pub async fn scan(&self, card: &DynamicImage, rois: &RoiSet) -> ScanResult {
        let id_type = rois.id_type();
        let today = self.options.today();
        let descriptor = get_descriptor(id_type);
        let mut diagnostics = ScanDiagnostics::default();
        advance(&mut diagnostics.states, ScanState::Init);

        let images = crop_fields_from_card(
            self.cropper.as_ref(),
            card,
            rois,
            descriptor.roi_profile.roi_keys,
            self.options.roi_padding,
        )
        .await;
        advance(&mut diagnostics.states, ScanState::RoiCropped);

        let recognized = self.recognize_fields(descriptor.roi_profile.roi_keys, &images).await;
        for (key, result) in &recognized {
            if let Some(confidence) = result.confidence {
                diagnostics.roi_confidence.insert(*key, confidence);
            }
            if !result.person_names.is_empty() {
                diagnostics.roi_person_names.insert(*key, result.person_names.clone());
            }
            diagnostics.roi_text.insert(*key, result.text.clone());
        }
        let roi_fields = roi_fields_from_text(id_type, descriptor.roi_profile.uses_split_name_rois, &recognized);
        diagnostics.roi_has_any_data = looks_like_name(&roi_fields.full_name)
            || looks_like_dob(&roi_fields.dob)
            || looks_like_id_token(&roi_fields.id_number);
        advance(&mut diagnostics.states, ScanState::RoiOcrDone);

        let full_card = self
            .ocr
            .recognize_or_empty("whole card", card, RecognizeOptions::block())
            .await;
        let from_full = if full_card.text.trim().is_empty() {
            ExtractedInfo::empty(id_type)
        } else {
            parse_text_by_id_type_at(&full_card.text, id_type, today)
        };
        advance(&mut diagnostics.states, ScanState::FullCardOcrDone);

        let merged_fields = merge(id_type, &roi_fields, &from_full);
        let merged = ExtractedInfo {
            full_name: merged_fields.merged_full_name,
            dob: merged_fields.merged_dob,
            id_number: merged_fields.merged_id_number,
            id_type: from_full.id_type,
            confidence: from_full.confidence,
            address: from_full.address.clone(),
        };
        advance(&mut diagnostics.states, ScanState::Merged);

        let validation = validate_at(
            id_type,
            &merged.full_name,
            &merged.dob,
            &merged.id_number,
            today,
        );
        advance(&mut diagnostics.states, ScanState::Validated);

        info!(
            %id_type,
            detected = %merged.id_type,
            ok = validation.ok,
            failed = ?validation.failed_fields,
            "scan finished"
        );

        diagnostics.roi_fields = roi_fields;
        diagnostics.full_card_text = full_card.text;
        diagnostics.full_card_confidence = full_card.confidence;
        diagnostics.full_card_person_names = full_card.person_names;
        diagnostics.full_card_parsed = from_full;
        diagnostics.roi_images = images;
        advance(&mut diagnostics.states, ScanState::Done);

        ScanResult {
            merged,
            has_useful_data: validation.ok,
            validation,
            diagnostics,
        }
    }

    /// OCRs every cropped field, in `keys` order.
    async fn recognize_fields(
        &self,
        keys: &[FieldKey],
        images: &HashMap<FieldKey, DynamicImage>,
    ) -> Vec<(FieldKey, OcrFieldResult)> {
        let present: Vec<(FieldKey, &DynamicImage)> = keys
            .iter()
            .filter_map(|key| images.get(key).map(|image| (*key, image)))
            .collect();

        if self.options.concurrent_field_ocr {
            let tasks = present.iter().map(|(key, image)| async move {
                let result = self.ocr.recognize_or_empty(key.as_str(), image, field_options(*key)).await;
                (*key, result)
            });
            return join_all(tasks).await;
        }

        let mut results = Vec::with_capacity(present.len());
        for (key, image) in present {
            let result = self.ocr.recognize_or_empty(key.as_str(), image, field_options(key)).await;
            results.push((key, result));
        }
        results
    }
}

/// Turns raw per-field OCR text into the ROI candidate values.
fn roi_fields_from_text(
    id_type: IdType,
    split_name: bool,
    recognized: &[(FieldKey, OcrFieldResult)],
) -> RoiFields {
    let text = |key: FieldKey| -> &str {
        recognized
            .iter()
            .find(|(k, _)| *k == key)
            .map_or("", |(_, r)| r.text.as_str())
    };

    let full_name = if split_name {
        [FieldKey::GivenNames, FieldKey::MiddleName, FieldKey::LastName]
            .into_iter()
            .map(|key| clean_split_name(text(key)))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        clean_roi_name(text(FieldKey::FullName))
    };

    let dob = extract_dob_from_text(text(FieldKey::Dob));

    let raw_id = text(FieldKey::IdNumber).trim();
    let id_number = match id_type {
        IdType::NationalId => {
            let extracted = extract_national_id_number(raw_id);
            if extracted.is_empty() {
                raw_id.to_string()
            } else {
                extracted
            }
        }
        _ => raw_id.to_string(),
    };

    debug!(
        %id_type,
        name = full_name.as_str(),
        dob = dob.as_str(),
        id_number = id_number.as_str(),
        "ROI fields"
    );

    RoiFields {
        full_name,
        dob,
        id_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognized(pairs: &[(FieldKey, &str)]) -> Vec<(FieldKey, OcrFieldResult)> {
        pairs
            .iter()
            .map(|(key, text)| {
                (
                    *key,
                    OcrFieldResult {
                        text: text.to_string(),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn split_name_parts_join_given_first() {
        let fields = roi_fields_from_text(
            IdType::NationalId,
            true,
            &recognized(&[
                (FieldKey::LastName, "Apelyido/Last Name DELA CRUZ"),
                (FieldKey::GivenNames, "JUAN"),
                (FieldKey::MiddleName, "SANTOS"),
                (FieldKey::Dob, "JANUARY 03, 1999"),
                (FieldKey::IdNumber, "1234 - 5678 - 9O12 - 3456"),
            ]),
        );
        assert_eq!(fields.full_name, "JUAN SANTOS DELA CRUZ");
        assert_eq!(fields.dob, "1999-01-03");
        assert_eq!(fields.id_number, "1234-5678-9012-3456");
    }

    #[test]
    fn other_types_keep_raw_id_text() {
        let fields = roi_fields_from_text(
            IdType::Umid,
            false,
            &recognized(&[(FieldKey::FullName, "MARIA CLARA SANTOS"), (FieldKey::IdNumber, " CRN-0111-2345678-9 ")]),
        );
        assert_eq!(fields.full_name, "MARIA CLARA SANTOS");
        assert_eq!(fields.id_number, "CRN-0111-2345678-9");
        assert_eq!(fields.dob, "");
    }

    #[test]
    fn unreadable_national_id_number_falls_back_to_text() {
        let fields = roi_fields_from_text(IdType::NationalId, true, &recognized(&[(FieldKey::IdNumber, " 1234-56 ")]));
        assert_eq!(fields.id_number, "1234-56");
    }

    #[test]
    fn hints_follow_field_kind() {
        assert_eq!(field_options(FieldKey::GivenNames).profile, Some(OcrProfile::Name));
        assert_eq!(field_options(FieldKey::Dob).profile, Some(OcrProfile::Dob));
        assert_eq!(field_options(FieldKey::IdNumber).profile, None);
    }
}
