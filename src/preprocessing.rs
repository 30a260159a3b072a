//! Preprocessing functions for input data for the waste classification model.
//! The model expects a single NHWC image: (1, 224, 224, 3), RGB, values in [0, 1].

use std::path::Path;
use image::{imageops::{self, FilterType}, DynamicImage, GenericImageView, RgbImage};
use ndarray::Array4;

use crate::error::{Error, Result};

pub const IMAGE_INPUT_SIZE: usize = 224;
pub const IMAGE_CHANNELS: usize = 3;

/// Channel ordering of a raw interleaved 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder
{
	Rgb,
	Bgr,
}

/// A decoded image of arbitrary size. Never empty.
#[derive(Debug, Clone)]
pub struct Image(DynamicImage);

impl Image
{
	pub fn from_dynamic(image: DynamicImage) -> Result<Self>
	{
		let (width, height) = image.dimensions();
		if width == 0 || height == 0
		{
			return Err(Error::InvalidImage(format!("image has no pixels ({}x{})", width, height)));
		}
		Ok(Image(image))
	}

	/// Decodes an encoded image (JPEG, PNG, ...). The format is guessed from the contents.
	pub fn decode(bytes: &[u8]) -> Result<Self>
	{
		if bytes.is_empty()
		{
			return Err(Error::InvalidImage("empty input".to_string()));
		}
		let image = image::load_from_memory(bytes)?;
		Self::from_dynamic(image)
	}

	pub fn open(path: &Path) -> Result<Self>
	{
		let bytes = std::fs::read(path)?;
		Self::decode(&bytes)
			.map_err(|e| match e
			{
				Error::InvalidImage(reason) => Error::InvalidImage(format!("{:?}: {}", path, reason)),
				other => other,
			})
	}

	/// Builds an image from a raw interleaved buffer of `width * height * 3` bytes.
	/// BGR buffers (as produced by OpenCV-style capture) are swapped to RGB.
	pub fn from_raw(width: u32, height: u32, order: ChannelOrder, mut data: Vec<u8>) -> Result<Self>
	{
		let expected = width as usize * height as usize * IMAGE_CHANNELS;
		if data.len() != expected
		{
			return Err(Error::InvalidImage(format!(
				"raw buffer holds {} bytes, expected {} for {}x{}x{}",
				data.len(), expected, width, height, IMAGE_CHANNELS)));
		}

		if order == ChannelOrder::Bgr
		{
			data.chunks_exact_mut(IMAGE_CHANNELS).for_each(|pixel| pixel.swap(0, 2));
		}

		let buffer = RgbImage::from_raw(width, height, data)
			.ok_or_else(|| Error::InvalidImage("raw buffer does not match its dimensions".to_string()))?;
		Self::from_dynamic(DynamicImage::ImageRgb8(buffer))
	}

	pub fn dimensions(&self) -> (u32, u32)
	{
		self.0.dimensions()
	}

	pub fn as_dynamic(&self) -> &DynamicImage
	{
		&self.0
	}
}

/// Converts the image to RGB and stretches it to IMAGE_INPUT_SIZE x IMAGE_INPUT_SIZE.
/// Aspect ratio is not preserved.
pub fn resize_image(image: &Image) -> RgbImage
{
	let rgb = image.as_dynamic().to_rgb8();
	imageops::resize(
		&rgb,
		IMAGE_INPUT_SIZE as u32,
		IMAGE_INPUT_SIZE as u32,
		FilterType::Triangle)
}

// Convert the image to the 4D array expected by the model
pub fn image_to_model_format(image: &Image) -> Array4<f32>
{
	let resized = resize_image(image);

	let mut image_input = Array4::zeros((1, IMAGE_INPUT_SIZE, IMAGE_INPUT_SIZE, IMAGE_CHANNELS));
	for (x, y, pixel) in resized.enumerate_pixels()
	{
		let x = x as usize;
		let y = y as usize;
		let [r, g, b] = pixel.0;
		image_input[[0, y, x, 0]] = (r as f32) / 255.;
		image_input[[0, y, x, 1]] = (g as f32) / 255.;
		image_input[[0, y, x, 2]] = (b as f32) / 255.;
	}

	image_input
}
