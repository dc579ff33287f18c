use super::messages::Message;
use super::state::{
    App, LoadingPhase, LoadingState, PlaybackPhase, PlayerState, Screen, SEGMENT_SCROLL_ID,
    TRAILING_SPACER_PX,
};
use crate::segments::slice_from;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::text::{LineHeight, Rich, Span, Wrapping};
use iced::widget::{
    button, column, container, horizontal_rule, row, scrollable, text, text_input, Column, Space,
};
use iced::{Color, Element, Length, Theme};

const DIM_TEXT: Color = Color::from_rgb(0.53, 0.56, 0.59);
const SPOKEN_BACKGROUND: Color = Color::from_rgb(0.25, 0.22, 0.05);

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        match self.screen {
            Screen::Selection => self.selection_view(),
            Screen::Loading => match &self.loading {
                Some(loading) => self.loading_view(loading),
                None => self.selection_view(),
            },
            Screen::Player => match &self.player {
                Some(player) => self.player_view(player),
                None => self.selection_view(),
            },
        }
    }

    fn selection_view(&self) -> Element<'_, Message> {
        let title = column![
            text("궁금한 작품이 있나요?").size(26),
            text("지금 질문해 보세요").size(26),
        ]
        .spacing(4);

        let question_input = text_input("예) 해바라기, 빈센트 반 고흐", &self.selection.question)
            .on_input(Message::QuestionChanged)
            .on_submit(Message::SubmitQuestion)
            .padding(12)
            .size(16);

        let mut chip_rows = Column::new().spacing(8);
        for (row_idx, chunk) in self.selection.chips.chunks(3).enumerate() {
            let mut chips = row![].spacing(8);
            for (col_idx, chip) in chunk.iter().enumerate() {
                let idx = row_idx * 3 + col_idx;
                let label = if chip.selected {
                    format!("✓ {}", chip.category.label())
                } else {
                    chip.category.label().to_string()
                };
                chips = chips.push(button(text(label).size(14)).on_press(Message::CategoryToggled(idx)));
            }
            chip_rows = chip_rows.push(chips);
        }

        let submit = if self.selection.question.trim().is_empty() {
            button(text("질문하기").size(16))
        } else {
            button(text("질문하기").size(16)).on_press(Message::SubmitQuestion)
        };

        let mut content = column![
            title,
            question_input,
            text("듣고 싶은 키워드를 골라 주세요").size(14).style(dim),
            chip_rows,
            submit,
        ]
        .spacing(16)
        .max_width(520);

        if let Some(warning) = &self.selection.warning {
            content = content.push(text(warning.clone()).size(14).style(danger));
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .padding(24)
            .into()
    }

    fn loading_view(&self, loading: &LoadingState) -> Element<'_, Message> {
        let content: Column<'_, Message> = match &loading.phase {
            LoadingPhase::InFlight => column![
                text("잠시만 기다려주세요").size(24),
                text(format!("'{}' 설명을 준비하고 있어요...", loading.question))
                    .size(16)
                    .style(dim),
                button(text("돌아가기").size(14)).on_press(Message::CancelLoading),
            ],
            LoadingPhase::Failed(message) => column![
                text("설명을 가져오지 못했어요").size(24),
                text(message.clone()).size(14).style(danger),
                row![
                    button(text("다시 시도").size(14)).on_press(Message::RetryFetch),
                    button(text("돌아가기").size(14)).on_press(Message::CancelLoading),
                ]
                .spacing(12),
            ],
        };

        container(content.spacing(20).align_x(Horizontal::Center))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .padding(24)
            .into()
    }

    fn player_view(&self, player: &PlayerState) -> Element<'_, Message> {
        let header = column![
            text(player.artwork_title.clone()).size(24),
            text(player.artist_name.clone()).size(15).style(dim),
        ]
        .spacing(2);

        let body: Element<'_, Message> = if player.overlay_visible {
            self.overlay_panel()
        } else {
            self.segment_list(player)
        };

        // Divider appears once the list is scrolled under the header.
        let divider: Element<'_, Message> = if player.scroll_y > 0.5 {
            horizontal_rule(1).into()
        } else {
            Space::with_height(1.0).into()
        };

        // Preparing still shows the pause label so a pending utterance can
        // be cancelled before its audio arrives.
        let play_label = if player.phase == PlaybackPhase::Stopped {
            "재생"
        } else {
            "일시정지"
        };
        let highlight_label = if player.highlight_only_active {
            "전체 보기"
        } else {
            "집중 보기"
        };
        let controls = row![
            button(text(play_label).size(15)).on_press(Message::TogglePlayPause),
            button(text(format!("{}x", player.display_rate())).size(15))
                .on_press(Message::CycleRate),
            button(text(highlight_label).size(15)).on_press(Message::ToggleHighlight),
            button(text("새 질문").size(15)).on_press(Message::NewSearch),
        ]
        .spacing(10)
        .align_y(Vertical::Center);

        column![header, divider, body, controls]
            .padding(16)
            .spacing(12)
            .height(Length::Fill)
            .into()
    }

    /// The segment list: category label plus narration per segment, the
    /// active one highlighted with its spoken prefix marked.
    fn segment_list(&self, player: &PlayerState) -> Element<'_, Message> {
        let font_size = self.config.font_size as f32;
        let line_height = LineHeight::Relative(self.config.line_spacing);

        let mut spans: Vec<Span<'_, Message>> = Vec::new();
        for (idx, segment) in player.segments.iter().enumerate() {
            let active = idx == player.current_idx;

            let mut label: Span<'_, Message> = Span::new(format!("{}\n", segment.category.label()))
                .size(font_size + 3.0)
                .line_height(line_height)
                .link(Message::SegmentClicked(idx));
            if !active && player.highlight_only_active {
                label = label.color(DIM_TEXT);
            }
            spans.push(label);

            if active {
                let spoken_chars = player.char_offset;
                let rest = slice_from(&segment.text, spoken_chars);
                let spoken_len = segment.text.len() - rest.len();
                if spoken_len > 0 {
                    spans.push(
                        Span::new(segment.text[..spoken_len].to_string())
                            .size(font_size)
                            .line_height(line_height)
                            .background(iced::Background::Color(SPOKEN_BACKGROUND))
                            .link(Message::SegmentClicked(idx)),
                    );
                }
                spans.push(
                    Span::new(format!("{rest}\n\n"))
                        .size(font_size)
                        .line_height(line_height)
                        .link(Message::SegmentClicked(idx)),
                );
            } else {
                let mut body: Span<'_, Message> = Span::new(format!("{}\n\n", segment.text))
                    .size(font_size)
                    .line_height(line_height)
                    .link(Message::SegmentClicked(idx));
                if player.highlight_only_active {
                    body = body.color(DIM_TEXT);
                }
                spans.push(body);
            }
        }

        let rich: Rich<'_, Message> = Rich::with_spans(spans);
        let content = column![
            rich.width(Length::Fill)
                .wrapping(Wrapping::WordOrGlyph)
                .align_x(Horizontal::Left),
            Space::with_height(TRAILING_SPACER_PX),
        ];

        scrollable(container(content).width(Length::Fill).padding([0.0, 4.0]))
            .on_scroll(|viewport| Message::Scrolled {
                absolute_y: viewport.absolute_offset().y,
                viewport_height: viewport.bounds().height,
                content_height: viewport.content_bounds().height,
            })
            .id(SEGMENT_SCROLL_ID.clone())
            .height(Length::FillPortion(1))
            .into()
    }

    fn overlay_panel(&self) -> Element<'_, Message> {
        let content = column![
            text("도슨트 사용법").size(22),
            text("재생을 누르면 선택한 키워드 순서대로 설명을 읽어 드려요.").size(15),
            text("문단을 누르면 그 부분부터 다시 들을 수 있어요.").size(15),
            text("배속 버튼으로 읽는 속도를 바꿀 수 있어요.").size(15),
            button(text("확인").size(15)).on_press(Message::DismissOverlay),
        ]
        .spacing(14)
        .align_x(Horizontal::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::FillPortion(1))
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .into()
    }
}

fn dim(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(DIM_TEXT),
    }
}

fn danger(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(theme.palette().danger),
    }
}
