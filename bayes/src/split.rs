//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

use rand::seq::SliceRandom;
use rand::Rng;

/// A fresh random train/test split over `len` indices.
/// The test partition holds `ceil(len * test_fraction)` elements.
pub(crate) fn train_test_indices<R: Rng + ?Sized>(
    len: usize,
    test_fraction: f64,
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let mut indices = (0..len).collect::<Vec<_>>();
    indices.shuffle(rng);
    let test_len = ((len as f64) * test_fraction).ceil() as usize;
    let train = indices.split_off(test_len);
    (train, indices)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn split_sizes_match_the_fraction() {
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = train_test_indices(10, 0.25, &mut rng);
        assert_eq!(7, train.len());
        assert_eq!(3, test.len());
    }

    #[test]
    fn split_partitions_all_indices() {
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = train_test_indices(20, 0.25, &mut rng);
        let mut all = train.into_iter().chain(test).collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!((0..20).collect::<Vec<_>>(), all);
    }
}
