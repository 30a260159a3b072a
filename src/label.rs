use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The number of classes the model distinguishes; its output vector has this length.
pub const NUM_CLASSES: usize = 2;

/// The category of a piece of waste.
/// Index 0 of the model output is Organic, index 1 is Recyclable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLabel
{
    Organic,
    Recyclable,
}

impl ClassLabel
{
    pub const ALL: [ClassLabel; NUM_CLASSES] = [ClassLabel::Organic, ClassLabel::Recyclable];

    pub fn from_index(index: usize) -> Result<Self>
    {
        match index
        {
            0 => Ok(ClassLabel::Organic),
            1 => Ok(ClassLabel::Recyclable),
            _ => Err(Error::InferenceFailure(format!("model produced unknown class index {}", index))),
        }
    }

    pub fn index(&self) -> usize
    {
        match self
        {
            ClassLabel::Organic => 0,
            ClassLabel::Recyclable => 1,
        }
    }

    pub fn name(&self) -> &'static str
    {
        match self
        {
            ClassLabel::Organic => "Organic Waste",
            ClassLabel::Recyclable => "Recyclable Waste",
        }
    }

    pub fn description(&self) -> &'static str
    {
        match self
        {
            ClassLabel::Organic => "This type of waste includes food scraps, yard waste, and other biodegradable materials. \
                Organic waste can be composted to create nutrient-rich soil, which is beneficial for agriculture and gardening.",
            ClassLabel::Recyclable => "This type of waste includes materials like plastics, metals, paper, and glass that can be processed and reused. \
                Proper recycling helps reduce landfill waste and conserves natural resources.",
        }
    }

    pub fn materials(&self) -> &'static str
    {
        match self
        {
            ClassLabel::Organic => "Food Scraps, Yard Waste",
            ClassLabel::Recyclable => "Plastics, Metals, Paper, Glass",
        }
    }

    pub fn emoji(&self) -> &'static str
    {
        match self
        {
            ClassLabel::Organic => "🌿",
            ClassLabel::Recyclable => "♻️",
        }
    }

    /// Maps a score vector to a label.
    /// The highest score wins; on a tie the lowest index wins, so Organic wins ties.
    pub fn from_scores(scores: &[f32]) -> Result<Self>
    {
        if scores.len() != NUM_CLASSES
        {
            return Err(Error::InferenceFailure(format!(
                "expected {} class scores, model produced {}", NUM_CLASSES, scores.len())));
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite())
        {
            return Err(Error::InferenceFailure(format!("model produced non-finite score {}", bad)));
        }

        let mut best = 0;
        for (index, score) in scores.iter().enumerate().skip(1)
        {
            if *score > scores[best]
            {
                best = index;
            }
        }

        Self::from_index(best)
    }
}

impl Display for ClassLabel
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.name())
    }
}
