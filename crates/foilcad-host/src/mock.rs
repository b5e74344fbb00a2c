//! 测试用内存宿主

use crate::host::{
    CadHost, CurveId, DocumentId, DocumentInfo, DocumentKind, HostError, PlaneId, PlaneInfo,
    SketchId, SketchInfo, SplineRequest,
};

pub(crate) struct MemoryHost {
    pub document: Option<DocumentInfo>,
    pub planes: Vec<PlaneInfo>,
    pub sketches: Vec<SketchInfo>,
    pub curves: Vec<(SketchId, SplineRequest)>,
    /// 前 N 次调用返回繁忙
    pub busy_remaining: usize,
    pub reject_splines: bool,
    pub calls: usize,
    next_id: u64,
}

impl MemoryHost {
    pub fn empty() -> Self {
        Self {
            document: None,
            planes: Vec::new(),
            sketches: Vec::new(),
            curves: Vec::new(),
            busy_remaining: 0,
            reject_splines: false,
            calls: 0,
            next_id: 100,
        }
    }

    pub fn with_document(kind: DocumentKind) -> Self {
        let mut host = Self::empty();
        host.document = Some(DocumentInfo {
            id: DocumentId(1),
            name: "Part1".into(),
            kind,
        });
        host.planes = vec![
            PlaneInfo {
                id: PlaneId(1),
                name: "Top (XY)".into(),
            },
            PlaneInfo {
                id: PlaneId(2),
                name: "Front (XZ)".into(),
            },
        ];
        host.sketches = vec![SketchInfo {
            id: SketchId(10),
            name: "Sketch A".into(),
            plane: PlaneId(1),
        }];
        host
    }

    pub fn part() -> Self {
        Self::with_document(DocumentKind::Part)
    }

    pub fn busy_for(mut self, calls: usize) -> Self {
        self.busy_remaining = calls;
        self
    }

    fn enter(&mut self) -> Result<(), HostError> {
        self.calls += 1;
        if self.busy_remaining > 0 {
            self.busy_remaining -= 1;
            return Err(HostError::Busy("call rejected by callee".into()));
        }
        Ok(())
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl CadHost for MemoryHost {
    fn active_document(&mut self) -> Result<Option<DocumentInfo>, HostError> {
        self.enter()?;
        Ok(self.document.clone())
    }

    fn reference_planes(&mut self, _doc: DocumentId) -> Result<Vec<PlaneInfo>, HostError> {
        self.enter()?;
        Ok(self.planes.clone())
    }

    fn sketches(&mut self, _doc: DocumentId) -> Result<Vec<SketchInfo>, HostError> {
        self.enter()?;
        Ok(self.sketches.clone())
    }

    fn create_sketch(
        &mut self,
        _doc: DocumentId,
        plane: PlaneId,
        name: &str,
    ) -> Result<SketchId, HostError> {
        self.enter()?;
        let id = SketchId(self.next_id());
        self.sketches.push(SketchInfo {
            id,
            name: name.to_string(),
            plane,
        });
        Ok(id)
    }

    fn delete_sketch(&mut self, sketch: SketchId) -> Result<(), HostError> {
        self.enter()?;
        let before = self.sketches.len();
        self.sketches.retain(|s| s.id != sketch);
        if self.sketches.len() == before {
            return Err(HostError::NotFound {
                kind: "Sketch",
                id: sketch.0,
            });
        }
        self.curves.retain(|(s, _)| *s != sketch);
        Ok(())
    }

    fn add_spline_by_points(
        &mut self,
        sketch: SketchId,
        request: &SplineRequest,
    ) -> Result<CurveId, HostError> {
        self.enter()?;
        if self.reject_splines {
            return Err(HostError::Rejected("spline creation failed".into()));
        }
        if !self.sketches.iter().any(|s| s.id == sketch) {
            return Err(HostError::NotFound {
                kind: "Sketch",
                id: sketch.0,
            });
        }
        self.curves.push((sketch, request.clone()));
        Ok(CurveId(self.next_id()))
    }
}
