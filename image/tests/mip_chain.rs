use scratchtex_core::{CubeFace, Format, ImageMetadata};
use scratchtex_image::{
    CpuResampler, FilterKind, ImageError, ImageStore, MipChainOutcome, ResampleError, Resampler,
    SubImage, SubImageMut,
};
use std::cell::Cell;

fn checkerboard_store(width: u32, height: u32, format: Format) -> ImageStore {
    let metadata = ImageMetadata::new_2d(width, height, format);
    let mut store = ImageStore::new(metadata).unwrap();
    {
        let sub = store.sub_image_mut(0, 0).unwrap();
        for y in 0..height as usize {
            for x in 0..width as usize {
                let value = if (x + y) % 2 == 0 { 0u8 } else { 255u8 };
                let pixel = y * sub.row_pitch + x * format.element_size() as usize;
                for channel in 0..format.element_size() as usize {
                    sub.data[pixel + channel] = value;
                }
            }
        }
    }
    store
}

#[test]
fn empty_chain_on_a_64x64_image() {
    let mut store = checkerboard_store(64, 64, Format::RGBA8UNorm);
    let base_before = store.sub_image(0, 0).unwrap().data.to_vec();

    let outcome = store.create_empty_mip_chain().unwrap();
    assert_eq!(outcome, MipChainOutcome::Built { levels: 7 });
    assert_eq!(store.metadata().mip_levels, 7);

    // 64 -> 32 -> 16 -> 8 -> 4 -> 2 -> 1
    let extents: Vec<u32> = store.images().map(|sub| sub.width).collect();
    assert_eq!(extents, vec![64, 32, 16, 8, 4, 2, 1]);

    assert_eq!(store.sub_image(0, 0).unwrap().data, &base_before[..]);
    for mip in 1..7 {
        let sub = store.sub_image(mip, 0).unwrap();
        assert!(sub.data.iter().all(|&byte| byte == 0));
    }
}

#[test]
fn empty_chain_on_a_cube_image() {
    let metadata = ImageMetadata::new_cube(16, 16, Format::RGBA8UNorm);
    let mut store = ImageStore::new(metadata).unwrap();
    for face in CubeFace::ALL {
        store
            .cube_face_mut(0, 0, face)
            .unwrap()
            .data
            .fill(face.index() as u8 + 10);
    }

    let outcome = store.create_empty_mip_chain().unwrap();
    assert_eq!(outcome, MipChainOutcome::Built { levels: 5 });
    assert!(store.metadata().is_cube());
    assert_eq!(store.metadata().array_length, 6);

    for face in CubeFace::ALL {
        let base = store.cube_face(0, 0, face).unwrap();
        assert!(base.data.iter().all(|&byte| byte == face.index() as u8 + 10));
        for mip in 1..5 {
            let sub = store.cube_face(mip, 0, face).unwrap();
            assert!(sub.data.iter().all(|&byte| byte == 0));
        }
    }
}

#[test]
fn empty_chain_is_idempotent_in_content() {
    let source = checkerboard_store(32, 32, Format::RGBA8UNorm);

    let mut first = source.clone();
    let mut second = source.clone();
    first.create_empty_mip_chain().unwrap();
    second.create_empty_mip_chain().unwrap();

    assert_eq!(first.metadata(), second.metadata());
    assert_eq!(first.data(), second.data());
    // The source itself was not touched.
    assert_eq!(source.metadata().mip_levels, 1);
}

#[test]
fn generated_chain_downsamples_every_slice_independently() {
    let metadata = ImageMetadata {
        array_length: 3,
        ..ImageMetadata::new_2d(8, 8, Format::R8UNorm)
    };
    let mut store = ImageStore::new(metadata).unwrap();
    for array_index in 0..3 {
        store
            .sub_image_mut(0, array_index)
            .unwrap()
            .data
            .fill(array_index as u8 * 50 + 50);
    }

    let outcome = store
        .generate_mip_maps(&CpuResampler, FilterKind::Box)
        .unwrap();
    assert_eq!(outcome, MipChainOutcome::Built { levels: 4 });

    for array_index in 0..3 {
        let expected = array_index as u8 * 50 + 50;
        for mip in 0..4 {
            let sub = store.sub_image(mip, array_index).unwrap();
            assert!(
                sub.data.iter().all(|&byte| byte == expected),
                "slice {} mip {} should stay flat at {}",
                array_index,
                mip,
                expected
            );
        }
    }
}

struct FailOnThirdSlice {
    calls: Cell<u32>,
    calls_per_slice: u32,
}

impl Resampler for FailOnThirdSlice {
    fn resample(
        &self,
        src: &SubImage,
        dst: &mut SubImageMut,
        filter: FilterKind,
    ) -> Result<(), ResampleError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call / self.calls_per_slice == 2 {
            return Err(ResampleError::Failed("slice 3 rejected".to_string()));
        }
        CpuResampler.resample(src, dst, filter)
    }
}

#[test]
fn resample_failure_leaves_the_original_store_byte_identical() {
    let metadata = ImageMetadata {
        array_length: 6,
        ..ImageMetadata::new_2d(16, 16, Format::RGBA8UNorm)
    };
    let mut store = ImageStore::new(metadata).unwrap();
    for array_index in 0..6 {
        store
            .sub_image_mut(0, array_index)
            .unwrap()
            .data
            .fill(array_index as u8 + 1);
    }
    let metadata_before = *store.metadata();
    let data_before = store.data().to_vec();

    // 16x16 -> 5 levels, four resample calls per slice.
    let resampler = FailOnThirdSlice {
        calls: Cell::new(0),
        calls_per_slice: 4,
    };
    let error = store
        .generate_mip_maps(&resampler, FilterKind::Box)
        .unwrap_err();

    assert!(matches!(error, ImageError::Resample(ResampleError::Failed(_))));
    assert_eq!(*store.metadata(), metadata_before);
    assert_eq!(store.data(), &data_before[..]);
    assert_eq!(store.metadata().mip_levels, 1);
}

#[test]
fn out_of_range_sub_image_access() {
    let mut metadata = ImageMetadata::new_2d(32, 32, Format::RGBA8UNorm);
    metadata.mip_levels = 3;
    let store = ImageStore::new(metadata).unwrap();

    assert_eq!(
        store.sub_image(5, 0).unwrap_err(),
        ImageError::OutOfRange { mip: 5, array_index: 0 }
    );
}

#[test]
fn upload_views_cover_the_whole_buffer() {
    let metadata = ImageMetadata {
        array_length: 2,
        ..ImageMetadata::new_2d(16, 8, Format::BC1)
    };
    let store = ImageStore::new(metadata).unwrap();

    let total: usize = store.images().map(|sub| sub.data.len()).sum();
    assert_eq!(total, store.data().len());
    assert_eq!(store.images().count(), 2);
}
