use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub base: u32,
    pub bytes: Vec<u8>,
    pub perms: &'static str, // e.g., "r-x"
    pub kind: &'static str,  // e.g., "raw"
}

impl Segment {
    pub fn end(&self) -> u32 {
        self.base.wrapping_add(self.bytes.len() as u32)
    }

    fn contains(&self, addr: u32) -> bool {
        addr >= self.base && addr < self.end()
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    pub segments: Vec<Segment>,
}

pub fn load_raw_bin(path: &Path, base: u32, skip: usize, len: Option<usize>) -> Result<Image> {
    let file = std::fs::read(path)?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    tracing::debug!(path = %path.display(), base, size = payload.len(), "loaded raw image");
    let seg = Segment { name: "segment0".into(), base, bytes: payload.to_vec(), perms: "r-x", kind: "raw" };
    Ok(Image { segments: vec![seg] })
}

pub fn read_u8(img: &Image, addr: u32) -> Option<u8> {
    slice_from(img, addr).and_then(|s| s.first().copied())
}

/// Bytes from `addr` to the end of the segment containing it.
pub fn slice_from(img: &Image, addr: u32) -> Option<&[u8]> {
    img.segments
        .iter()
        .find(|s| s.contains(addr))
        .map(|s| &s.bytes[(addr - s.base) as usize..])
}

pub fn is_mapped(img: &Image, addr: u32) -> bool {
    img.segments.iter().any(|s| s.contains(addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_maps_skip_and_len() {
        let path = std::env::temp_dir().join("_msp430_model_test.bin");
        std::fs::write(&path, [0u8, 1, 2, 3, 4, 5]).unwrap();
        let img = load_raw_bin(&path, 0xC000, 2, Some(3)).unwrap();
        assert_eq!(img.segments.len(), 1);
        let s = &img.segments[0];
        assert_eq!(s.base, 0xC000);
        assert_eq!(s.bytes, vec![2, 3, 4]);
        assert_eq!(slice_from(&img, 0xC001).unwrap(), &[3, 4]);
        assert_eq!(read_u8(&img, 0xC002), Some(4));
        assert!(read_u8(&img, 0xC003).is_none());
        assert!(!is_mapped(&img, 0xBFFF));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loader_rejects_oversized_window() {
        let path = std::env::temp_dir().join("_msp430_model_window.bin");
        std::fs::write(&path, [0u8; 4]).unwrap();
        assert!(load_raw_bin(&path, 0, 5, None).is_err());
        assert!(load_raw_bin(&path, 0, 2, Some(3)).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
