use soilsight::image::luma;
use soilsight::{GrayImage, ImageView, PixelBuffer, SoilSightError};

#[test]
fn pixel_buffer_rejects_length_mismatch() {
    let err = PixelBuffer::new(vec![0u8; 11], 2, 2).err().unwrap();
    assert_eq!(
        err,
        SoilSightError::BufferSizeMismatch {
            expected: 12,
            got: 11,
        }
    );
}

#[test]
fn pixel_buffer_allows_zero_area() {
    let buffer = PixelBuffer::new(Vec::new(), 0, 4).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(buffer.pixels().count(), 0);
}

#[test]
fn pixel_buffer_accessors_follow_row_major_layout() {
    let buffer = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, (x + y) as u8]).unwrap();
    assert_eq!(buffer.width(), 3);
    assert_eq!(buffer.height(), 2);
    assert_eq!(buffer.as_raw().len(), 18);
    assert_eq!(buffer.pixel(2, 1), Some([2, 1, 3]));
    assert_eq!(buffer.pixel(3, 0), None);
    assert_eq!(buffer.row(1).unwrap(), &[0, 1, 1, 1, 1, 2, 2, 1, 3]);
    assert!(buffer.row(2).is_none());
}

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        SoilSightError::InvalidImage {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        SoilSightError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );

    let err = ImageView::new(&data[..3], 2, 2, 2).err().unwrap();
    assert_eq!(err, SoilSightError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_honors_stride() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::new(&data, 3, 3, 4).unwrap();
    assert_eq!(view.stride(), 4);
    assert_eq!(view.get(0, 1), Some(&4));
    assert_eq!(view.get(2, 2), Some(&10));
    assert_eq!(view.get(3, 0), None);
    assert_eq!(view.row(1).unwrap(), &[4, 5, 6]);
}

#[test]
fn gray_conversion_uses_luma_weights() {
    assert_eq!(luma([128, 128, 128]), 128);
    assert_eq!(luma([255, 255, 255]), 255);

    let buffer = PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { [255, 0, 0] } else { [0, 0, 255] })
        .unwrap();
    let gray = soilsight::image::to_gray(&buffer).unwrap();
    assert_eq!(gray.data(), &[76, 29]);
}

#[test]
fn gray_image_validates_shape() {
    assert!(matches!(
        GrayImage::from_vec(vec![0; 5], 2, 3),
        Err(SoilSightError::BufferSizeMismatch { expected: 6, got: 5 })
    ));
    let gray = GrayImage::from_vec(vec![7; 6], 2, 3).unwrap();
    assert_eq!(gray.view().get(1, 2), Some(&7));
}
