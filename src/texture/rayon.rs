//! Rayon-parallel texture encoding (feature-gated).
//!
//! Rows are independent, so each worker fills whole output rows. The result is
//! identical to [`encode_with_plan`](crate::texture::encode_with_plan).

use crate::image::ImageView;
use crate::texture::{TextureCodes, TextureParams, TexturePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::SoilSightResult;
use rayon::prelude::*;

/// Row-parallel variant of [`encode`](crate::texture::encode).
pub fn encode_par(
    image: ImageView<'_, u8>,
    params: &TextureParams,
) -> SoilSightResult<TextureCodes> {
    let plan = TexturePlan::new(params)?;
    Ok(encode_with_plan_par(image, &plan))
}

/// Row-parallel variant of [`encode_with_plan`](crate::texture::encode_with_plan).
pub fn encode_with_plan_par(image: ImageView<'_, u8>, plan: &TexturePlan) -> TextureCodes {
    let width = image.width();
    let height = image.height();
    let _span = trace_span!("texture_encode_par", width = width, height = height).entered();

    let mut data = vec![0u32; width * height];
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| plan.encode_row(image, y, row));

    trace_event!("texture_encoded", samples = plan.samples(), radius = plan.radius());
    TextureCodes::from_vec(data, width, height)
}
