//! Review edits on analysis output
//!
//! After analysis a person reviews the detected points: relabelling,
//! nudging, deleting and adding hits. Every edit marks the touched point as
//! confirmed, and moves/additions keep the list sorted by time so the result
//! can become a rhythm map directly.

use super::{AnalysisResult, DrumPoint};

impl AnalysisResult {
    /// Relabel a point and mark it confirmed
    ///
    /// # Returns
    /// `false` if `index` is out of range
    pub fn relabel_point(&mut self, index: usize, drum: &str) -> bool {
        match self.drum_points.get_mut(index) {
            Some(point) => {
                point.auto_drum = drum.to_string();
                point.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Confirm a point without changing it
    pub fn confirm_point(&mut self, index: usize) -> bool {
        match self.drum_points.get_mut(index) {
            Some(point) => {
                point.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Move a point to `time` (clamped at 0) and mark it confirmed
    ///
    /// # Returns
    /// The point's index after re-sorting, or `None` if `index` is out of range
    pub fn move_point(&mut self, index: usize, time: f64) -> Option<usize> {
        if index >= self.drum_points.len() {
            return None;
        }

        let mut point = self.drum_points.remove(index);
        point.time = time.max(0.0);
        point.confirmed = true;
        Some(self.insert_sorted(point))
    }

    /// Remove a point
    pub fn delete_point(&mut self, index: usize) -> Option<DrumPoint> {
        if index < self.drum_points.len() {
            Some(self.drum_points.remove(index))
        } else {
            None
        }
    }

    /// Add a hand-placed point; it is confirmed by construction
    ///
    /// # Returns
    /// Index of the new point
    pub fn add_point(&mut self, time: f64, drum: &str, strength: f32, frequency: f32) -> usize {
        self.insert_sorted(DrumPoint {
            time: time.max(0.0),
            strength: strength.clamp(0.0, 1.0),
            frequency: frequency.max(0.0),
            auto_drum: drum.to_string(),
            confirmed: true,
        })
    }

    /// Number of points a person has confirmed
    pub fn confirmed_count(&self) -> usize {
        self.drum_points.iter().filter(|p| p.confirmed).count()
    }

    /// Insert after any points with the same time
    fn insert_sorted(&mut self, point: DrumPoint) -> usize {
        let index = self.drum_points.partition_point(|p| p.time <= point.time);
        self.drum_points.insert(index, point);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: f64, drum: &str) -> DrumPoint {
        DrumPoint {
            time,
            strength: 0.8,
            frequency: 100.0,
            auto_drum: drum.to_string(),
            confirmed: false,
        }
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            drum_points: vec![point(0.5, "kick"), point(1.0, "snare"), point(1.5, "kick")],
            bpm: 120,
            duration: 2.0,
            sample_rate: 44100,
        }
    }

    #[test]
    fn test_relabel_confirms() {
        let mut analysis = result();
        assert!(analysis.relabel_point(1, "hihat-open"));
        assert_eq!(analysis.drum_points[1].auto_drum, "hihat-open");
        assert!(analysis.drum_points[1].confirmed);
        assert!(!analysis.relabel_point(9, "kick"));
        assert_eq!(analysis.confirmed_count(), 1);
    }

    #[test]
    fn test_move_resorts_and_clamps() {
        let mut analysis = result();

        assert_eq!(analysis.move_point(0, 1.75), Some(2));
        let times: Vec<f64> = analysis.drum_points.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![1.0, 1.5, 1.75]);
        assert!(analysis.drum_points[2].confirmed);

        assert_eq!(analysis.move_point(2, -3.0), Some(0));
        assert_eq!(analysis.drum_points[0].time, 0.0);

        assert_eq!(analysis.move_point(7, 1.0), None);
    }

    #[test]
    fn test_delete_point() {
        let mut analysis = result();
        let removed = analysis.delete_point(1).unwrap();
        assert_eq!(removed.auto_drum, "snare");
        assert_eq!(analysis.drum_points.len(), 2);
        assert!(analysis.delete_point(5).is_none());
    }

    #[test]
    fn test_add_point_keeps_order() {
        let mut analysis = result();

        let index = analysis.add_point(1.0, "crash", 1.4, 6000.0);
        assert_eq!(index, 2, "co-timed point goes after the existing one");
        assert_eq!(analysis.drum_points[2].auto_drum, "crash");
        assert_eq!(analysis.drum_points[2].strength, 1.0);
        assert!(analysis.drum_points[2].confirmed);

        assert_eq!(analysis.add_point(0.1, "kick", 0.5, 60.0), 0);
        assert_eq!(analysis.drum_points.len(), 5);
    }
}
