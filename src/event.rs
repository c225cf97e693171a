// MIT/Apache2 License

use crate::{ImageElement, PresentationStateReader};

/// Something that happened upstream of an image operation.
///
/// Each kind of event carries only what an operation needs to react to it.
#[derive(Debug, Copy, Clone)]
pub enum ImageOpEvent<'a> {
    /// A different image is now displayed. `None` if nothing is displayed.
    ImageChange(Option<&'a ImageElement>),
    /// The display was reset to the defaults of the current image.
    ResetDisplay(Option<&'a ImageElement>),
    /// A presentation state was applied to the display.
    ApplyPresentationState(Option<&'a PresentationStateReader>),
    /// The displayed series changed. Operations that do not care about series ignore this.
    SeriesChange,
}

impl<'a> ImageOpEvent<'a> {
    /// The image carried by this event, if it is an image event.
    #[inline]
    pub fn image(&self) -> Option<&'a ImageElement> {
        match self {
            ImageOpEvent::ImageChange(image) | ImageOpEvent::ResetDisplay(image) => *image,
            _ => None,
        }
    }
}
