//! Workflow steps and the route table between them

use std::fmt;

use crate::collab::CallKind;
use crate::layout::Product;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Step {
    #[default]
    Upload,
    PaperTypeSelect,
    Crop,
    /// Passport only: choose processing mode and strength
    Enhance,
    /// Polaroid only: enter the two captions and a font
    CaptionText,
    /// Passport only: choose the sheet layout
    LayoutSelect,
    /// Waiting for a composited preview; never a back-navigation target
    RemoteProcessing,
    Preview,
    Done,
}

impl Step {
    /// Step the user returns to on back, if back is allowed here
    pub fn back_target(self, product: Option<Product>) -> Option<Step> {
        match (self, product) {
            (Step::Crop, _) => Some(Step::PaperTypeSelect),
            (Step::Enhance, _) | (Step::CaptionText, _) => Some(Step::Crop),
            (Step::LayoutSelect, _) => Some(Step::Enhance),
            (Step::Preview, Some(Product::Passport)) => Some(Step::LayoutSelect),
            (Step::Preview, Some(Product::Polaroid)) => Some(Step::CaptionText),
            (Step::Done, _) => Some(Step::Preview),
            _ => None,
        }
    }
}

/// Everything the user can ask the workflow to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowAction {
    SubmitUpload,
    SelectProduct,
    AdjustViewport,
    ConfirmCrop,
    EditEnhancement,
    ConfirmEnhancement,
    EditCaptions,
    ConfirmCaptions,
    SelectLayout,
    ConfirmLayout,
    Download,
    Print,
    ListPrinters,
    Back,
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WorkflowAction::SubmitUpload => "upload a photo",
            WorkflowAction::SelectProduct => "select a paper type",
            WorkflowAction::AdjustViewport => "adjust the crop",
            WorkflowAction::ConfirmCrop => "confirm the crop",
            WorkflowAction::EditEnhancement => "change enhancement settings",
            WorkflowAction::ConfirmEnhancement => "confirm enhancement",
            WorkflowAction::EditCaptions => "edit captions",
            WorkflowAction::ConfirmCaptions => "confirm captions",
            WorkflowAction::SelectLayout => "select a layout",
            WorkflowAction::ConfirmLayout => "confirm the layout",
            WorkflowAction::Download => "download the sheet",
            WorkflowAction::Print => "print the sheet",
            WorkflowAction::ListPrinters => "list printers",
            WorkflowAction::Back => "go back",
        };
        f.write_str(text)
    }
}

/// Condition checked against the session before a route fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// The upload file passes type and size checks
    UploadAccepted,
    /// Natural dimensions are known and the crop region is valid
    CropValid,
    /// Enhancement level lies in 0.0..=1.0
    EnhancementValid,
    /// The collaborator returned a processed image
    ProcessedImage,
    /// Both captions are valid
    CaptionsValid,
    /// At least one copy is requested
    CopiesRequested,
}

/// One forward edge of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub from: Step,
    /// `None` matches any product, including none chosen yet
    pub product: Option<Product>,
    pub action: WorkflowAction,
    pub guard: Guard,
    /// Collaborator call issued when the route fires
    pub call: Option<CallKind>,
    /// Step reached once the route (and its call, if any) succeeds
    pub to: Step,
    /// Show [`Step::RemoteProcessing`] while the call is pending
    pub remote: bool,
}

const fn route(
    from: Step,
    product: Option<Product>,
    action: WorkflowAction,
    guard: Guard,
    call: Option<CallKind>,
    to: Step,
) -> Route {
    Route {
        from,
        product,
        action,
        guard,
        call,
        to,
        remote: false,
    }
}

const fn remote(
    from: Step,
    product: Product,
    action: WorkflowAction,
    guard: Guard,
    call: CallKind,
) -> Route {
    Route {
        from,
        product: Some(product),
        action,
        guard,
        call: Some(call),
        to: Step::Preview,
        remote: true,
    }
}

use CallKind as C;
use Guard as G;
use Product::{Passport, Polaroid};
use Step as S;
use WorkflowAction as A;

pub const ROUTES: &[Route] = &[
    route(S::Upload, None, A::SubmitUpload, G::UploadAccepted, Some(C::Upload), S::PaperTypeSelect),
    route(S::PaperTypeSelect, None, A::SelectProduct, G::Always, None, S::Crop),
    // Passport
    route(S::Crop, Some(Passport), A::ConfirmCrop, G::CropValid, None, S::Enhance),
    route(S::Enhance, Some(Passport), A::ConfirmEnhancement, G::EnhancementValid, Some(C::ApplyCrop), S::LayoutSelect),
    remote(S::LayoutSelect, Passport, A::ConfirmLayout, G::ProcessedImage, C::PreviewSheet),
    route(S::Preview, Some(Passport), A::Download, G::Always, Some(C::DownloadSheet), S::Done),
    route(S::Preview, Some(Passport), A::Print, G::CopiesRequested, Some(C::PrintSheet), S::Done),
    route(S::Preview, Some(Passport), A::ListPrinters, G::Always, Some(C::ListPrinters), S::Preview),
    route(S::Done, Some(Passport), A::Download, G::Always, Some(C::DownloadSheet), S::Done),
    route(S::Done, Some(Passport), A::Print, G::CopiesRequested, Some(C::PrintSheet), S::Done),
    route(S::Done, Some(Passport), A::ListPrinters, G::Always, Some(C::ListPrinters), S::Done),
    // Polaroid
    route(S::Crop, Some(Polaroid), A::ConfirmCrop, G::CropValid, Some(C::ApplyCrop), S::CaptionText),
    remote(S::CaptionText, Polaroid, A::ConfirmCaptions, G::CaptionsValid, C::PreviewCaptionSheet),
    route(S::Preview, Some(Polaroid), A::Download, G::Always, Some(C::DownloadCaptionSheet), S::Done),
    route(S::Done, Some(Polaroid), A::Download, G::Always, Some(C::DownloadCaptionSheet), S::Done),
];

/// Find the forward route for `action` at `step`
pub fn find_route(step: Step, product: Option<Product>, action: WorkflowAction) -> Option<&'static Route> {
    ROUTES.iter().find(|r| {
        r.from == step && r.action == action && (r.product.is_none() || r.product == product)
    })
}

/// Forward actions available at `step`
pub fn routes_from(step: Step, product: Option<Product>) -> impl Iterator<Item = &'static Route> {
    ROUTES
        .iter()
        .filter(move |r| r.from == step && (r.product.is_none() || r.product == product))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_are_unambiguous() {
        for (i, a) in ROUTES.iter().enumerate() {
            for b in &ROUTES[i + 1..] {
                let same_product = a.product.is_none() || b.product.is_none() || a.product == b.product;
                assert!(
                    !(a.from == b.from && a.action == b.action && same_product),
                    "duplicate route {:?} {:?}",
                    a.from,
                    a.action
                );
            }
        }
    }

    #[test]
    fn test_remote_processing_is_never_a_back_target() {
        let steps = [
            Step::Upload,
            Step::PaperTypeSelect,
            Step::Crop,
            Step::Enhance,
            Step::CaptionText,
            Step::LayoutSelect,
            Step::RemoteProcessing,
            Step::Preview,
            Step::Done,
        ];
        for step in steps {
            for product in [None, Some(Product::Passport), Some(Product::Polaroid)] {
                assert_ne!(step.back_target(product), Some(Step::RemoteProcessing));
            }
        }
        assert_eq!(Step::PaperTypeSelect.back_target(None), None);
    }

    #[test]
    fn test_polaroid_has_no_layout_or_print() {
        assert!(find_route(Step::Preview, Some(Product::Polaroid), WorkflowAction::Print).is_none());
        assert!(routes_from(Step::LayoutSelect, Some(Product::Polaroid)).next().is_none());
    }
}
